//! Arithmetic transitions for the dispatch engine.
//!
//! Binary operators reduce their left operand first. Operands that are already
//! values (constants, variables) are read on the spot; anything else is
//! reduced under a reified frame:
//!
//! - `DivL`/`AddL`/`LeL` hold the right operand while the left one is pending
//! - `DivR`/`AddR`/`LeR` hold the left value while the right one is pending
//!
//! `Le` lives here too: its operands are arithmetic even though its result is
//! a boolean.

use crate::backend::term::{FrameClass, Term, TermHandle};
use super::types::{Fault, MachineResult, State};
use super::Machine;

/// Binary operators over integer operands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BinaryOp {
    Div,
    Add,
    Le,
}

impl BinaryOp {
    /// Frame remembering the right operand while the left one is reduced
    fn left_frame(self, right: TermHandle) -> Term {
        match self {
            Self::Div => Term::DivL(right),
            Self::Add => Term::AddL(right),
            Self::Le => Term::LeL(right),
        }
    }

    /// Frame remembering the left value while the right operand is reduced
    fn right_frame(self, left: i64) -> Term {
        match self {
            Self::Div => Term::DivR(left),
            Self::Add => Term::AddR(left),
            Self::Le => Term::LeR(left),
        }
    }

    fn apply(self, left: i64, right: i64) -> MachineResult<State> {
        match self {
            Self::Div if right == 0 => Err(Fault::division_by_zero(left)),
            Self::Div => Ok(State::ArithValue(left.wrapping_div(right))),
            Self::Add => Ok(State::ArithValue(left.wrapping_add(right))),
            Self::Le => Ok(State::BoolValue(left <= right)),
        }
    }
}

impl Machine<'_> {
    /// Value of a term that needs no reduction, `None` if it does
    pub(super) fn immediate_arith(&self, term: Term) -> MachineResult<Option<i64>> {
        match term {
            Term::ACon(value) => Ok(Some(value)),
            Term::AVar(id) => self.store.get(id).map(Some),
            _ => Ok(None),
        }
    }

    pub(super) fn arith_pending(&mut self, term: Term) -> MachineResult<State> {
        match term {
            Term::ACon(value) => Ok(State::ArithValue(value)),
            Term::AVar(id) => Ok(State::ArithValue(self.store.get(id)?)),
            Term::Div(left, right) => self.binary(BinaryOp::Div, left, right),
            Term::Add(left, right) => self.binary(BinaryOp::Add, left, right),
            other => Err(Fault::unrecognized("arithmetic expression", other)),
        }
    }

    /// Start a binary operator at its left operand
    pub(super) fn binary(
        &mut self,
        op: BinaryOp,
        left: TermHandle,
        right: TermHandle,
    ) -> MachineResult<State> {
        let left = self.term(left);
        match self.immediate_arith(left)? {
            Some(value) => self.binary_right(op, value, right),
            None => {
                self.push(op.left_frame(right))?;
                Ok(State::ArithPending(left))
            }
        }
    }

    /// Left value known; reduce the right operand
    fn binary_right(&mut self, op: BinaryOp, left: i64, right: TermHandle) -> MachineResult<State> {
        let right = self.term(right);
        match self.immediate_arith(right)? {
            Some(value) => op.apply(left, value),
            None => {
                self.push(op.right_frame(left))?;
                Ok(State::ArithPending(right))
            }
        }
    }

    /// Hand an integer to the arithmetic consumer on top of the stack
    pub(super) fn arith_value(&mut self, value: i64) -> MachineResult<State> {
        match self.pop_consumer(FrameClass::ArithConsumer)? {
            Term::DivR(left) => BinaryOp::Div.apply(left, value),
            Term::AddR(left) => BinaryOp::Add.apply(left, value),
            Term::LeR(left) => BinaryOp::Le.apply(left, value),
            Term::DivL(right) => self.binary_right(BinaryOp::Div, value, right),
            Term::AddL(right) => self.binary_right(BinaryOp::Add, value, right),
            Term::LeL(right) => self.binary_right(BinaryOp::Le, value, right),
            Term::AssignR(var) => {
                self.store.set(var, value)?;
                Ok(State::NextStatement)
            }
            other => Err(Fault::illegal_frame(FrameClass::ArithConsumer, other)),
        }
    }
}
