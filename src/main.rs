/// imp-machine - run the canonical programs on the dispatch engine
use imp_machine::backend::programs::{load_sum, load_test, ACCUMULATOR, COUNTER};
use imp_machine::backend::reference::ReferenceEvaluator;
use imp_machine::backend::{
    Machine, MachineResult, RunOutcome, TermArena, TermHandle, VariableStore,
};
use imp_machine::MachineConfig;
use std::env;
use std::process;
use tracing::Level;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("imp-machine v{}", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    imp-machine [OPTIONS] <N>");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -h, --help             Print this help message");
    eprintln!("    -v, --version          Print version information");
    eprintln!("    --program <NAME>       Program to run: sum (default) or test");
    eprintln!("    --reference            Run the recursive reference evaluator instead");
    eprintln!("    --dump                 Print the program's nodes before running");
    eprintln!("    --trace                Log every machine step to stderr");
    eprintln!("    --config <FILE>        Load capacities from a TOML file");
    eprintln!();
    eprintln!("ARGUMENTS:");
    eprintln!("    <N>                    Program parameter (sum: upper bound, test: initial x0)");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    IMP_ARENA_CAPACITY, IMP_STACK_CAPACITY, IMP_VARIABLE_CAPACITY, IMP_TRACE");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    imp-machine 100");
    eprintln!("    imp-machine --program test 7");
    eprintln!("    imp-machine --trace --dump 3");
}

fn print_version() {
    println!("imp-machine {}", VERSION);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProgramKind {
    Sum,
    Test,
}

struct Options {
    n: i64,
    program: ProgramKind,
    reference: bool,
    dump: bool,
    trace: bool,
    config: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();

    let mut n = None;
    let mut program = ProgramKind::Sum;
    let mut reference = false;
    let mut dump = false;
    let mut trace = false;
    let mut config = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            "--program" => {
                i += 1;
                program = match args.get(i).map(String::as_str) {
                    Some("sum") => ProgramKind::Sum,
                    Some("test") => ProgramKind::Test,
                    Some(other) => return Err(format!("Unknown program: {}", other)),
                    None => return Err("Missing program name after --program".to_string()),
                };
            }
            "--reference" => {
                reference = true;
            }
            "--dump" => {
                dump = true;
            }
            "--trace" => {
                trace = true;
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing config file after --config".to_string());
                }
                config = Some(args[i].clone());
            }
            arg if arg.starts_with("--") => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if n.is_some() {
                    return Err("Multiple program parameters specified".to_string());
                }
                let value = arg
                    .parse::<i64>()
                    .map_err(|e| format!("Invalid program parameter '{}': {}", arg, e))?;
                n = Some(value);
            }
        }
        i += 1;
    }

    let n = n.ok_or_else(|| "Missing program parameter".to_string())?;

    Ok(Options {
        n,
        program,
        reference,
        dump,
        trace,
        config,
    })
}

fn load_config(options: &Options) -> Result<MachineConfig, String> {
    let config = match &options.config {
        Some(path) => MachineConfig::load(path).and_then(MachineConfig::merge_env),
        None => MachineConfig::from_env(),
    }
    .map_err(|e| e.to_string())?;
    Ok(if options.trace { config.with_trace(true) } else { config })
}

fn init_tracing(trace: bool) {
    let level = if trace { Level::TRACE } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build(arena: &mut TermArena, options: &Options) -> MachineResult<TermHandle> {
    match options.program {
        ProgramKind::Sum => load_sum(arena, options.n),
        ProgramKind::Test => load_test(arena, options.n),
    }
}

fn execute(
    arena: &TermArena,
    program: TermHandle,
    options: &Options,
    config: MachineConfig,
) -> (RunOutcome, VariableStore) {
    if options.reference {
        let mut evaluator = ReferenceEvaluator::new(arena, config.variable_capacity);
        let outcome = evaluator.run(program);
        (outcome, evaluator.into_store())
    } else {
        let mut machine = Machine::with_config(arena, config);
        let outcome = machine.run(program);
        let stats = machine.stats();
        tracing::debug!(
            target: "imp_machine::cli",
            steps = stats.steps,
            peak = stats.peak_stack_depth,
            "engine finished"
        );
        (outcome, machine.into_store())
    }
}

fn main() {
    let options = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    let config = match load_config(&options) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    init_tracing(config.trace);

    let mut arena = TermArena::with_capacity(config.arena_capacity);
    let program = match build(&mut arena, &options) {
        Ok(program) => program,
        Err(fault) => {
            eprintln!("Error: {}", fault);
            process::exit(fault.kind.exit_code());
        }
    };

    if options.dump {
        print!("{}", arena.dump());
    }

    let (outcome, store) = execute(&arena, program, &options, config);
    match outcome {
        RunOutcome::Completed => {
            let n = store.value(COUNTER).unwrap_or_default();
            let sum = store.value(ACCUMULATOR).unwrap_or_default();
            println!("Done. n={} sum={}", n, sum);
        }
        RunOutcome::Fault(fault) => {
            eprintln!("Error: {}", fault);
            process::exit(fault.kind.exit_code());
        }
    }
}
