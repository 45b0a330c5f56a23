//! Tests for the canonical sum program, in-process and through the CLI

use imp_machine::backend::programs::{load_sum, load_test, ACCUMULATOR, COUNTER};
use imp_machine::backend::reference::evaluate;
use imp_machine::backend::{Machine, RunOutcome, TermArena};
use imp_machine::{run, MachineConfig};
use std::process::Command;

fn imp_machine(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_imp-machine"))
        .args(args)
        .env_remove("IMP_ARENA_CAPACITY")
        .env_remove("IMP_STACK_CAPACITY")
        .env_remove("IMP_VARIABLE_CAPACITY")
        .env_remove("IMP_TRACE")
        .output()
        .expect("failed to execute imp-machine");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_sum_matches_closed_form() {
    let config = MachineConfig::default();
    for n in [0i64, 1, 2, 10, 100, 1000] {
        let mut arena = TermArena::with_capacity(config.arena_capacity);
        let program = load_sum(&mut arena, n).unwrap();

        let (outcome, store) = run(&arena, program, &config);
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(store.value(ACCUMULATOR), Some(n * (n + 1) / 2));
        assert_eq!(store.value(COUNTER), Some(0));
    }
}

#[test]
fn test_sum_of_negative_bound_is_zero() {
    let mut arena = TermArena::with_capacity(64);
    let program = load_sum(&mut arena, -5).unwrap();

    let (outcome, store) = run(&arena, program, &MachineConfig::default());
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(store.value(COUNTER), Some(-5));
    assert_eq!(store.value(ACCUMULATOR), Some(0));
}

#[test]
fn test_engine_and_reference_agree_on_sum() {
    let mut arena = TermArena::with_capacity(64);
    let program = load_sum(&mut arena, 250).unwrap();

    let (engine, engine_store) = run(&arena, program, &MachineConfig::default());
    let (reference, reference_store) = evaluate(&arena, program, 64);
    assert_eq!(engine, reference);
    assert_eq!(engine_store, reference_store);
}

#[test]
fn test_sum_stack_stays_shallow() {
    let mut arena = TermArena::with_capacity(64);
    let program = load_sum(&mut arena, 10_000).unwrap();

    let mut machine = Machine::new(&arena);
    assert_eq!(machine.run(program), RunOutcome::Completed);
    assert!(machine.stack().is_empty());
    assert!(machine.stats().peak_stack_depth <= 4);
}

#[test]
fn test_straight_line_program() {
    let mut arena = TermArena::with_capacity(64);
    let program = load_test(&mut arena, 9).unwrap();

    let (outcome, store) = run(&arena, program, &MachineConfig::default());
    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(store.value(COUNTER), Some(9));
    assert_eq!(store.value(ACCUMULATOR), Some(0));
}

#[test]
fn test_cli_sum() {
    let (code, stdout, _) = imp_machine(&["100"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Done. n=0 sum=5050");
}

#[test]
fn test_cli_reference() {
    let (code, stdout, _) = imp_machine(&["--reference", "100"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Done. n=0 sum=5050");
}

#[test]
fn test_cli_test_program() {
    let (code, stdout, _) = imp_machine(&["--program", "test", "7"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Done. n=7 sum=0");
}

#[test]
fn test_cli_dump() {
    let (code, stdout, _) = imp_machine(&["--dump", "--program", "test", "3"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("] = ACon 3"), "{}", stdout);
    assert!(stdout.contains("] = Pgm "), "{}", stdout);
    assert!(stdout.trim_end().ends_with("Done. n=3 sum=0"));
}

#[test]
fn test_cli_trace_logs_steps() {
    let (code, _, stderr) = imp_machine(&["--trace", "2"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("imp_machine::machine::step"), "{}", stderr);
    assert!(stderr.contains("depth="), "{}", stderr);
    assert!(!stderr.contains(" ~> "), "whole stack logged: {}", stderr);
}

#[test]
fn test_cli_missing_parameter() {
    let (code, _, stderr) = imp_machine(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Missing program parameter"));
}

#[test]
fn test_cli_unknown_program() {
    let (code, _, stderr) = imp_machine(&["--program", "fib", "3"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown program: fib"));
}

#[test]
fn test_cli_arena_exhausted() {
    let output = Command::new(env!("CARGO_BIN_EXE_imp-machine"))
        .arg("10")
        .env("IMP_ARENA_CAPACITY", "4")
        .output()
        .expect("failed to execute imp-machine");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("arena exhausted"));
}

#[test]
fn test_cli_env_capacity_too_large() {
    let output = Command::new(env!("CARGO_BIN_EXE_imp-machine"))
        .arg("5")
        .env("IMP_STACK_CAPACITY", "18446744073709551615")
        .output()
        .expect("failed to execute imp-machine");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "{}", stderr);
    assert!(stderr.contains("stack_capacity"), "{}", stderr);
    assert!(stderr.contains("exceeds the maximum"), "{}", stderr);
}

#[test]
fn test_cli_env_capacity_not_a_number() {
    let output = Command::new(env!("CARGO_BIN_EXE_imp-machine"))
        .arg("5")
        .env("IMP_ARENA_CAPACITY", "lots")
        .output()
        .expect("failed to execute imp-machine");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "{}", stderr);
    assert!(stderr.contains("IMP_ARENA_CAPACITY"), "{}", stderr);
}

#[test]
fn test_cli_config_file_capacity_too_large() {
    let path = std::env::temp_dir().join(format!("imp-machine-{}.toml", std::process::id()));
    std::fs::write(&path, "stack_capacity = 9223372036854775807\n").unwrap();

    let (code, _, stderr) = imp_machine(&["--config", path.to_str().unwrap(), "5"]);
    std::fs::remove_file(&path).ok();

    assert_eq!(code, 1, "{}", stderr);
    assert!(stderr.contains("exceeds the maximum"), "{}", stderr);
}
