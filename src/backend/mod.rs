// Backend module for the imperative-language abstract machine
//
// This module provides the execution architecture where:
// - `term`: programs and continuation frames as one fixed-shape `Term` type in an arena
// - `machine`: the non-recursive dispatch engine driving an explicit continuation stack
// - `reference`: the recursive big-step evaluator the engine is checked against
// - `programs`: canonical programs (sum 1..n, straight-line test)

pub mod machine;
pub mod programs;
pub mod reference;
pub mod term;

pub use machine::{
    build_and_run, run, ContinuationStack, Fault, FaultKind, Machine, MachineResult, RunOutcome,
    RunStats, State, VariableStore,
};
pub use term::{FrameClass, Opcode, Term, TermArena, TermHandle, VarId};
