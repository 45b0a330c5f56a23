//! Term opcodes
//!
//! Every term carries one of these tags. Opcodes are grouped by arity and
//! assigned contiguous 16-wide ranges so the arity of a tag can be read off
//! its number:
//!
//! - `0x00-0x0F`: nullary and immediate forms
//! - `0x10-0x1F`: unary forms (one handle, optionally with an immediate)
//! - `0x20-0x2F`: binary forms
//! - `0x30-0x3F`: ternary forms
//!
//! Some opcodes never appear in source programs; they only exist as
//! continuation frames on the machine stack (see [`Opcode::is_stack_only`]).

use std::fmt;

const UNARY_BASE: u32 = 0x10;
const BINARY_BASE: u32 = 0x20;
const TERNARY_BASE: u32 = 0x30;

/// Term opcode enumeration
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // === Nullary (0x00-0x0F) ===
    /// Integer constant, 64-bit immediate
    ACon = 0x00,
    /// Variable reference, variable id immediate
    AVar = 0x01,
    /// Boolean constant
    BCon = 0x02,
    /// Stack only: divide the remembered left value by the incoming value
    DivR = 0x03,
    /// Stack only: add the remembered left value to the incoming value
    AddR = 0x04,
    /// Stack only: compare the remembered left value with the incoming value
    LeR = 0x05,
    /// Stack only: negate the incoming boolean
    NotF = 0x06,
    /// Stack only: store the incoming value into a variable
    AssignR = 0x07,
    /// No-op statement
    Skip = 0x08,
    /// End of a variable list
    Nil = 0x09,

    // === Unary (0x10-0x1F) ===
    /// Boolean negation
    Not = UNARY_BASE,
    /// Assignment: expression handle plus variable id immediate
    Assign = UNARY_BASE + 1,
    /// Stack only: left operand of a division is pending, right operand handle
    DivL = UNARY_BASE + 2,
    /// Stack only: left operand of an addition is pending, right operand handle
    AddL = UNARY_BASE + 3,
    /// Stack only: left operand of a comparison is pending, right operand handle
    LeL = UNARY_BASE + 4,
    /// Stack only: left conjunct is pending, right conjunct handle
    AndL = UNARY_BASE + 5,
    /// Heap indirection (reserved)
    Ind = UNARY_BASE + 6,

    // === Binary (0x20-0x2F) ===
    /// Integer division
    Div = BINARY_BASE,
    /// Integer addition
    Add = BINARY_BASE + 1,
    /// Integer less-or-equal
    Le = BINARY_BASE + 2,
    /// Short-circuit conjunction
    And = BINARY_BASE + 3,
    /// Loop: condition handle, body handle
    While = BINARY_BASE + 4,
    /// Sequencing
    Seq = BINARY_BASE + 5,
    /// Variable list cell
    Cons = BINARY_BASE + 6,
    /// Stack only: pending loop test
    WhileC = BINARY_BASE + 7,
    /// Stack only: pending branch selection
    IfC = BINARY_BASE + 8,
    /// Program: variable list handle and body handle
    Pgm = BINARY_BASE + 9,

    // === Ternary (0x30-0x3F) ===
    /// Conditional: condition, then-branch, else-branch
    If = TERNARY_BASE,
}

impl Opcode {
    /// Convert opcode to its raw tag
    #[inline]
    pub fn to_u32(self) -> u32 {
        self as u32
    }

    /// Number of handle children a term with this tag carries.
    ///
    /// Immediates (constants, variable ids) are not counted.
    #[inline]
    pub fn arity(self) -> usize {
        (self.to_u32() / UNARY_BASE) as usize
    }

    /// Whether the tag only ever appears as a continuation frame
    #[inline]
    pub fn is_stack_only(self) -> bool {
        matches!(
            self,
            Self::DivR | Self::AddR | Self::LeR | Self::NotF | Self::AssignR
            | Self::DivL | Self::AddL | Self::LeL | Self::AndL
            | Self::WhileC | Self::IfC
        )
    }

    /// Get the mnemonic name for this opcode
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::ACon => "ACon",
            Self::AVar => "AVar",
            Self::BCon => "BCon",
            Self::DivR => "DivR",
            Self::AddR => "AddR",
            Self::LeR => "LeR",
            Self::NotF => "NotF",
            Self::AssignR => "AssignR",
            Self::Skip => "Skip",
            Self::Nil => "Nil",
            Self::Not => "Not",
            Self::Assign => "Assign",
            Self::DivL => "DivL",
            Self::AddL => "AddL",
            Self::LeL => "LeL",
            Self::AndL => "AndL",
            Self::Pgm => "Pgm",
            Self::Ind => "Ind",
            Self::Div => "Div",
            Self::Add => "Add",
            Self::Le => "Le",
            Self::And => "And",
            Self::While => "While",
            Self::Seq => "Seq",
            Self::Cons => "Cons",
            Self::WhileC => "WhileC",
            Self::IfC => "IfC",
            Self::If => "If",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_group_by_range() {
        assert_eq!(Opcode::Nil.to_u32(), 0x09);
        assert_eq!(Opcode::Ind.to_u32(), 0x16);
        assert_eq!(Opcode::Pgm.to_u32(), 0x29);
        assert_eq!(Opcode::If.to_u32(), 0x30);
    }

    #[test]
    fn test_arity_follows_range() {
        assert_eq!(Opcode::ACon.arity(), 0);
        assert_eq!(Opcode::Skip.arity(), 0);
        assert_eq!(Opcode::Assign.arity(), 1);
        assert_eq!(Opcode::Ind.arity(), 1);
        assert_eq!(Opcode::Pgm.arity(), 2);
        assert_eq!(Opcode::Seq.arity(), 2);
        assert_eq!(Opcode::IfC.arity(), 2);
        assert_eq!(Opcode::If.arity(), 3);
    }

    #[test]
    fn test_stack_only() {
        assert!(Opcode::DivR.is_stack_only());
        assert!(Opcode::AndL.is_stack_only());
        assert!(Opcode::WhileC.is_stack_only());
        assert!(!Opcode::While.is_stack_only());
        assert!(!Opcode::Seq.is_stack_only());
        assert!(!Opcode::ACon.is_stack_only());
    }

    #[test]
    fn test_mnemonic() {
        assert_eq!(Opcode::AssignR.mnemonic(), "AssignR");
        assert_eq!(format!("{}", Opcode::WhileC), "WhileC");
    }
}
