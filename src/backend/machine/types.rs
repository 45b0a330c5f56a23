//! Type definitions for the dispatch engine.
//!
//! - Fault / FaultKind: classified fatal terminations
//! - RunOutcome: what a run reports to its caller
//! - RunStats: per-run counters
//! - State: the machine's control state between two steps

use std::fmt;

use crate::backend::term::{FrameClass, Term};

/// Result of a machine operation
pub type MachineResult<T> = Result<T, Fault>;

/// Classification of a fatal termination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Integer division with a zero divisor
    DivisionByZero,
    /// A term appeared where its category is not licensed
    UnrecognizedTerm,
    /// A variable was read or written without being declared
    UndeclaredVariable,
    /// The continuation stack is full
    StackExhausted,
    /// A value was produced with no consumer frame on the stack
    StackUnderflow,
    /// The term arena is full
    ArenaExhausted,
}

impl FaultKind {
    /// Process exit status used by the command-line driver
    pub fn exit_code(self) -> i32 {
        match self {
            Self::DivisionByZero => 2,
            Self::UnrecognizedTerm => 3,
            _ => 1,
        }
    }

    /// Whether the fault comes from exceeding a fixed capacity
    pub fn is_construction(self) -> bool {
        matches!(self, Self::StackExhausted | Self::ArenaExhausted)
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DivisionByZero => "Division by zero",
            Self::UnrecognizedTerm => "Unrecognized term",
            Self::UndeclaredVariable => "Undeclared variable",
            Self::StackExhausted => "Continuation stack exhausted",
            Self::StackUnderflow => "Continuation stack underflow",
            Self::ArenaExhausted => "Term arena exhausted",
        };
        f.write_str(name)
    }
}

/// A classified fatal termination with enough detail to reproduce it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub detail: String,
}

impl Fault {
    pub fn new(kind: FaultKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn division_by_zero(dividend: i64) -> Self {
        Self::new(FaultKind::DivisionByZero, format!("{} / 0", dividend))
    }

    /// `term` showed up where a `category` was expected
    pub fn unrecognized(category: &str, term: Term) -> Self {
        Self::new(
            FaultKind::UnrecognizedTerm,
            format!("expected {}, found {}", category, term),
        )
    }

    /// A popped frame does not belong to the class the current state consumes
    pub fn illegal_frame(expected: FrameClass, frame: Term) -> Self {
        Self::new(
            FaultKind::UnrecognizedTerm,
            format!("expected {} frame, found {}", expected, frame),
        )
    }

    pub fn stack_exhausted(capacity: usize, frame: Term) -> Self {
        Self::new(
            FaultKind::StackExhausted,
            format!("capacity {} reached while pushing {}", capacity, frame),
        )
    }

    pub fn stack_underflow(expected: FrameClass) -> Self {
        Self::new(
            FaultKind::StackUnderflow,
            format!("no {} frame to resume", expected),
        )
    }

    pub fn arena_exhausted(capacity: usize, term: Term) -> Self {
        Self::new(
            FaultKind::ArenaExhausted,
            format!("capacity {} reached while allocating {}", capacity, term),
        )
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

impl std::error::Error for Fault {}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The body ran to completion; the variable store holds the final values
    Completed,
    /// The run stopped at a fault; the store keeps whatever was committed
    Fault(Fault),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Completed => None,
            Self::Fault(fault) => Some(fault),
        }
    }

    pub fn fault_kind(&self) -> Option<FaultKind> {
        self.fault().map(|f| f.kind)
    }
}

impl From<MachineResult<()>> for RunOutcome {
    fn from(result: MachineResult<()>) -> Self {
        match result {
            Ok(()) => Self::Completed,
            Err(fault) => Self::Fault(fault),
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Fault(fault) => write!(f, "Fault({})", fault),
        }
    }
}

/// Counters for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Number of state transitions taken
    pub steps: u64,
    /// Deepest continuation stack observed
    pub peak_stack_depth: usize,
}

/// Control state of the machine between two steps.
///
/// The current term plus the variant fully determines what the next step does;
/// everything that must happen afterwards lives on the continuation stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Walking the variable list; `vars` is the remaining list
    ProgramEntry { vars: Term, body: Term },
    /// Execute a statement
    Statement(Term),
    /// Resume the next pending statement, or halt on an empty stack
    NextStatement,
    /// Reduce an arithmetic term to a value
    ArithPending(Term),
    /// An integer is ready for the top consumer frame
    ArithValue(i64),
    /// Reduce a boolean term to a value
    BoolPending(Term),
    /// A boolean is ready for the top consumer frame
    BoolValue(bool),
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgramEntry { vars, .. } => write!(f, "pgm: {}", vars),
            Self::Statement(term) => write!(f, "stmt: {}", term),
            Self::NextStatement => f.write_str("next_stmt"),
            Self::ArithPending(term) => write!(f, "aexp: {}", term),
            Self::ArithValue(n) => write!(f, "acon: {}", n),
            Self::BoolPending(term) => write!(f, "bexp: {}", term),
            Self::BoolValue(b) => write!(f, "bcon: {}", b),
        }
    }
}
