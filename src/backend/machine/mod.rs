//! Dispatch Engine
//!
//! Runs a program without recursing on the native stack. Every "what to do
//! with this value" is a [`Term`] frame on the [`ContinuationStack`], and the
//! engine is a single loop over an explicit [`State`]:
//!
//! ```text
//! ProgramEntry ──► Statement ◄──────────────┐
//!                    │   ▲                  │
//!          push frame│   │pop statement     │ WhileC/IfC
//!                    ▼   │                  │
//!   ArithPending ◄─ ... NextStatement    BoolValue
//!        │                   ▲              ▲
//!        ▼        AssignR    │              │ LeR / NotF / AndL
//!   ArithValue ──────────────┘──────────────┘
//! ```
//!
//! A value state never looks at the current term: it pops the top frame and
//! lets that frame decide what happens next. Which frames a state may pop is
//! fixed by [`FrameClass`]; anything else is reported as a fault.
//!
//! This module is organized into submodules by syntactic category:
//! - `types`: Fault, RunOutcome, RunStats and the State enum
//! - `stack`: the continuation stack
//! - `store`: the variable store
//! - `statement`: program entry, statements, loop and branch resumption
//! - `arithmetic`: arithmetic reduction and arithmetic consumer frames
//! - `boolean`: boolean reduction and boolean consumer frames

use std::ops::ControlFlow;

use tracing::{debug, trace, warn};

use crate::backend::term::{FrameClass, Term, TermArena, TermHandle};
use crate::config::MachineConfig;

// === Submodules ===

mod arithmetic;
mod boolean;
mod stack;
mod statement;
mod store;
mod types;


// === Re-exports ===

pub use stack::ContinuationStack;
pub use store::VariableStore;
pub use types::{Fault, FaultKind, MachineResult, RunOutcome, RunStats, State};

// === Machine Struct ===

/// One in-flight run: the read-only program arena plus the mutable
/// continuation stack and variable store.
#[derive(Debug)]
pub struct Machine<'a> {
    /// Program terms, read-only during execution
    arena: &'a TermArena,

    /// Pending statements and reified expression contexts
    stack: ContinuationStack,

    /// Variable slots
    store: VariableStore,

    /// Capacities and tracing
    config: MachineConfig,

    /// Counters for the last run
    stats: RunStats,
}

impl<'a> Machine<'a> {
    // === Constructors ===

    pub fn new(arena: &'a TermArena) -> Self {
        Self::with_config(arena, MachineConfig::default())
    }

    pub fn with_config(arena: &'a TermArena, config: MachineConfig) -> Self {
        Self {
            arena,
            stack: ContinuationStack::with_capacity(config.stack_capacity),
            store: VariableStore::with_capacity(config.variable_capacity),
            config,
            stats: RunStats::default(),
        }
    }

    // === Accessors ===

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn into_store(self) -> VariableStore {
        self.store
    }

    pub fn stack(&self) -> &ContinuationStack {
        &self.stack
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    // === Execution ===

    /// Run `program` (a `Pgm` term) to completion or to its first fault.
    ///
    /// The stack and the store are reset first, so running the same program
    /// twice gives the same outcome.
    pub fn run(&mut self, program: TermHandle) -> RunOutcome {
        self.stack.clear();
        self.store.reset();
        self.stats = RunStats::default();

        debug!(target: "imp_machine::machine", %program, terms = self.arena.len(), "run start");
        let outcome = RunOutcome::from(self.execute(program));

        match &outcome {
            RunOutcome::Completed => {
                debug!(
                    target: "imp_machine::machine",
                    steps = self.stats.steps,
                    peak = self.stats.peak_stack_depth,
                    "run completed"
                );
            }
            RunOutcome::Fault(fault) => {
                warn!(
                    target: "imp_machine::machine::fault",
                    kind = ?fault.kind,
                    detail = %fault.detail,
                    steps = self.stats.steps,
                    "run faulted"
                );
            }
        }
        outcome
    }

    /// The trampoline: feed each state to `step` until it breaks.
    fn execute(&mut self, program: TermHandle) -> MachineResult<()> {
        let mut state = self.enter(program)?;
        loop {
            self.stats.steps += 1;
            if self.config.trace {
                trace!(
                    target: "imp_machine::machine::step",
                    state = %state,
                    depth = self.stack.len(),
                    top = ?self.stack.peek()
                );
            }
            match self.step(state)? {
                ControlFlow::Continue(next) => state = next,
                ControlFlow::Break(()) => return Ok(()),
            }
        }
    }

    fn enter(&self, program: TermHandle) -> MachineResult<State> {
        match self.term(program) {
            Term::Pgm { vars, body } => Ok(State::ProgramEntry {
                vars: self.term(vars),
                body: self.term(body),
            }),
            other => Err(Fault::unrecognized("program", other)),
        }
    }

    /// Take one transition.
    ///
    /// Breaks only from `NextStatement` with an empty stack.
    pub fn step(&mut self, state: State) -> MachineResult<ControlFlow<(), State>> {
        let next = match state {
            State::ProgramEntry { vars, body } => self.program_entry(vars, body)?,
            State::Statement(term) => self.statement(term)?,
            State::NextStatement => match self.stack.pop() {
                None => return Ok(ControlFlow::Break(())),
                Some(frame) if frame.frame_class() == Some(FrameClass::Statement) => {
                    State::Statement(frame)
                }
                Some(frame) => return Err(Fault::illegal_frame(FrameClass::Statement, frame)),
            },
            State::ArithPending(term) => self.arith_pending(term)?,
            State::ArithValue(value) => self.arith_value(value)?,
            State::BoolPending(term) => self.bool_pending(term)?,
            State::BoolValue(value) => self.bool_value(value)?,
        };
        Ok(ControlFlow::Continue(next))
    }

    // === Helpers shared by the category submodules ===

    #[inline]
    fn term(&self, handle: TermHandle) -> Term {
        self.arena.term_at(handle)
    }

    /// Push a consumer frame built by the machine
    #[inline]
    fn push(&mut self, frame: Term) -> MachineResult<()> {
        debug_assert!(frame.opcode().is_stack_only(), "{} pushed as a consumer frame", frame);
        self.push_statement(frame)
    }

    /// Push a statement to run later; it is checked when popped
    #[inline]
    fn push_statement(&mut self, stmt: Term) -> MachineResult<()> {
        self.stack.push(stmt)?;
        self.stats.peak_stack_depth = self.stats.peak_stack_depth.max(self.stack.len());
        Ok(())
    }

    /// Pop the frame that consumes the value just produced
    fn pop_consumer(&mut self, class: FrameClass) -> MachineResult<Term> {
        match self.stack.pop() {
            None => Err(Fault::stack_underflow(class)),
            Some(frame) if frame.frame_class() == Some(class) => Ok(frame),
            Some(frame) => Err(Fault::illegal_frame(class, frame)),
        }
    }
}

/// Run `program` on a fresh machine and hand back the outcome and the store.
pub fn run(
    arena: &TermArena,
    program: TermHandle,
    config: &MachineConfig,
) -> (RunOutcome, VariableStore) {
    let mut machine = Machine::with_config(arena, config.clone());
    let outcome = machine.run(program);
    (outcome, machine.into_store())
}

/// Build a program into a fresh arena, then run it.
///
/// An arena overflow while building aborts before execution and is reported
/// as an `ArenaExhausted` fault with an untouched store.
pub fn build_and_run<F>(config: &MachineConfig, build: F) -> (RunOutcome, VariableStore)
where
    F: FnOnce(&mut TermArena) -> MachineResult<TermHandle>,
{
    let mut arena = TermArena::with_capacity(config.arena_capacity);
    match build(&mut arena) {
        Ok(program) => run(&arena, program, config),
        Err(fault) => {
            warn!(
                target: "imp_machine::machine::fault",
                kind = ?fault.kind,
                detail = %fault.detail,
                "program construction failed"
            );
            (
                RunOutcome::Fault(fault),
                VariableStore::with_capacity(config.variable_capacity),
            )
        }
    }
}
