/// imp-machine - Defunctionalized Abstract Machine Library
///
/// This library executes a minimal imperative language (integer and boolean
/// expressions, assignment, sequencing, conditionals, while-loops) with an
/// explicit, non-recursive dispatch loop. Where a recursive interpreter would
/// rely on the native call stack to remember "what to do with this
/// subexpression's value", the machine pushes that remainder of the
/// computation as a data frame onto its own continuation stack.
///
/// # Architecture
///
/// 1. **Term Model** (`backend::term`)
///    - One 16-byte `Term` sum type for both program nodes and stack frames
///    - Append-only `TermArena` with stable integer handles
///    - Constructor operations for every syntactic form
///
/// 2. **Dispatch Engine** (`backend::machine`)
///    - Explicit `State` enum driven by a single trampoline loop
///    - Fixed-capacity `ContinuationStack` and `VariableStore`
///    - Classified faults: division by zero, unrecognized term, undeclared
///      variable, stack/arena exhaustion
///
/// 3. **Reference Evaluator** (`backend::reference`)
///    - Recursive big-step oracle used to check the engine
///
/// # Example
///
/// ```rust
/// use imp_machine::backend::programs::{load_sum, ACCUMULATOR, COUNTER};
/// use imp_machine::backend::{Machine, RunOutcome, TermArena};
///
/// let mut arena = TermArena::with_capacity(64);
/// let program = load_sum(&mut arena, 10).unwrap();
///
/// let mut machine = Machine::new(&arena);
/// assert_eq!(machine.run(program), RunOutcome::Completed);
/// assert_eq!(machine.store().value(ACCUMULATOR), Some(55));
/// assert_eq!(machine.store().value(COUNTER), Some(0));
/// ```

pub mod backend;
pub mod config;

pub use backend::{
    build_and_run, run, Fault, FaultKind, Machine, RunOutcome, Term, TermArena, TermHandle, VarId,
    VariableStore,
};
pub use config::{ConfigError, MachineConfig};
