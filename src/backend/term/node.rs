//! Term nodes
//!
//! A [`Term`] is the single node type shared by source programs and by the
//! continuation frames the machine pushes while it runs. Each variant carries
//! exactly the payload its opcode licenses, so a structural term can never be
//! read as an immediate one (or the other way around).

use std::fmt;

use super::opcodes::Opcode;

/// Stable index of a term inside a [`TermArena`](super::TermArena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermHandle(u32);

impl TermHandle {
    /// Only the arena hands out handles.
    #[inline]
    pub(crate) fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TermHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense variable identifier, assigned when the program is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Which kind of consumer a stack frame is.
///
/// The machine only ever pops a frame whose class matches its current mode:
/// statement frames are resumed by `NextStatement`, arithmetic consumers by an
/// arithmetic value, boolean consumers by a boolean value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClass {
    /// A pending statement (`Skip`, `Seq`, `Assign`, `If`, `While`)
    Statement,
    /// Waits for an integer (`DivR`, `AddR`, `LeR`, `AssignR`, `DivL`, `AddL`, `LeL`)
    ArithConsumer,
    /// Waits for a boolean (`NotF`, `AndL`, `WhileC`, `IfC`)
    BoolConsumer,
}

impl fmt::Display for FrameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Statement => "statement",
            Self::ArithConsumer => "arithmetic consumer",
            Self::BoolConsumer => "boolean consumer",
        };
        f.write_str(name)
    }
}

/// AST node and continuation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    // Nullary / immediate forms
    ACon(i64),
    AVar(VarId),
    BCon(bool),
    DivR(i64),
    AddR(i64),
    LeR(i64),
    NotF,
    AssignR(VarId),
    Skip,
    Nil,

    // Unary forms
    Not(TermHandle),
    Assign { expr: TermHandle, var: VarId },
    DivL(TermHandle),
    AddL(TermHandle),
    LeL(TermHandle),
    AndL(TermHandle),
    Ind(TermHandle),

    // Binary forms
    Div(TermHandle, TermHandle),
    Add(TermHandle, TermHandle),
    Le(TermHandle, TermHandle),
    And(TermHandle, TermHandle),
    While { cond: TermHandle, body: TermHandle },
    Seq(TermHandle, TermHandle),
    Cons { head: TermHandle, tail: TermHandle },
    WhileC { cond: TermHandle, body: TermHandle },
    IfC { then: TermHandle, otherwise: TermHandle },
    Pgm { vars: TermHandle, body: TermHandle },

    // Ternary forms
    If { cond: TermHandle, then: TermHandle, otherwise: TermHandle },
}

impl Term {
    /// The opcode tag of this term
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::ACon(_) => Opcode::ACon,
            Self::AVar(_) => Opcode::AVar,
            Self::BCon(_) => Opcode::BCon,
            Self::DivR(_) => Opcode::DivR,
            Self::AddR(_) => Opcode::AddR,
            Self::LeR(_) => Opcode::LeR,
            Self::NotF => Opcode::NotF,
            Self::AssignR(_) => Opcode::AssignR,
            Self::Skip => Opcode::Skip,
            Self::Nil => Opcode::Nil,
            Self::Not(_) => Opcode::Not,
            Self::Assign { .. } => Opcode::Assign,
            Self::DivL(_) => Opcode::DivL,
            Self::AddL(_) => Opcode::AddL,
            Self::LeL(_) => Opcode::LeL,
            Self::AndL(_) => Opcode::AndL,
            Self::Ind(_) => Opcode::Ind,
            Self::Div(..) => Opcode::Div,
            Self::Add(..) => Opcode::Add,
            Self::Le(..) => Opcode::Le,
            Self::And(..) => Opcode::And,
            Self::While { .. } => Opcode::While,
            Self::Seq(..) => Opcode::Seq,
            Self::Cons { .. } => Opcode::Cons,
            Self::WhileC { .. } => Opcode::WhileC,
            Self::IfC { .. } => Opcode::IfC,
            Self::Pgm { .. } => Opcode::Pgm,
            Self::If { .. } => Opcode::If,
        }
    }

    /// Handle children in field order
    pub fn children(&self) -> impl Iterator<Item = TermHandle> {
        let slots: [TermHandle; 3] = match *self {
            Self::Not(a)
            | Self::Assign { expr: a, .. }
            | Self::DivL(a)
            | Self::AddL(a)
            | Self::LeL(a)
            | Self::AndL(a)
            | Self::Ind(a) => [a, a, a],
            Self::Div(a, b)
            | Self::Add(a, b)
            | Self::Le(a, b)
            | Self::And(a, b)
            | Self::Seq(a, b)
            | Self::While { cond: a, body: b }
            | Self::Cons { head: a, tail: b }
            | Self::WhileC { cond: a, body: b }
            | Self::IfC { then: a, otherwise: b }
            | Self::Pgm { vars: a, body: b } => [a, b, b],
            Self::If { cond, then, otherwise } => [cond, then, otherwise],
            _ => [TermHandle::new(0); 3],
        };
        slots.into_iter().take(self.opcode().arity())
    }

    /// Stack-frame class of this term, `None` if it may never sit on the stack
    pub fn frame_class(&self) -> Option<FrameClass> {
        match self {
            Self::Skip
            | Self::Seq(..)
            | Self::Assign { .. }
            | Self::If { .. }
            | Self::While { .. } => Some(FrameClass::Statement),
            Self::DivR(_)
            | Self::AddR(_)
            | Self::LeR(_)
            | Self::AssignR(_)
            | Self::DivL(_)
            | Self::AddL(_)
            | Self::LeL(_) => Some(FrameClass::ArithConsumer),
            Self::NotF | Self::AndL(_) | Self::WhileC { .. } | Self::IfC { .. } => {
                Some(FrameClass::BoolConsumer)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match self {
            Self::ACon(n) | Self::DivR(n) | Self::AddR(n) | Self::LeR(n) => {
                write!(f, "{} {}", op, n)
            }
            Self::BCon(b) => write!(f, "{} {}", op, b),
            Self::AVar(v) | Self::AssignR(v) => write!(f, "{} {}", op, v),
            Self::Assign { expr, var } => write!(f, "{} {} {}", op, var, expr),
            _ => {
                write!(f, "{}", op)?;
                for child in self.children() {
                    write!(f, " {}", child)?;
                }
                Ok(())
            }
        }
    }
}
