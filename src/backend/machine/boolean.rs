//! Boolean transitions for the dispatch engine.
//!
//! `and` never reduces its right operand when the left one is false: the
//! `AndL` frame holds the right operand's handle, and `conjoin` only descends
//! into it on `true`.

use crate::backend::term::{FrameClass, Term, TermHandle};
use super::arithmetic::BinaryOp;
use super::types::{Fault, MachineResult, State};
use super::Machine;

impl Machine<'_> {
    pub(super) fn bool_pending(&mut self, term: Term) -> MachineResult<State> {
        match term {
            Term::BCon(value) => Ok(State::BoolValue(value)),

            Term::Not(operand) => match self.term(operand) {
                Term::BCon(value) => Ok(State::BoolValue(!value)),
                operand => {
                    self.push(Term::NotF)?;
                    Ok(State::BoolPending(operand))
                }
            },

            Term::Le(left, right) => self.binary(BinaryOp::Le, left, right),

            Term::And(left, right) => match self.term(left) {
                Term::BCon(value) => Ok(self.conjoin(value, right)),
                left => {
                    self.push(Term::AndL(right))?;
                    Ok(State::BoolPending(left))
                }
            },

            other => Err(Fault::unrecognized("boolean expression", other)),
        }
    }

    fn conjoin(&self, left: bool, right: TermHandle) -> State {
        if left {
            State::BoolPending(self.term(right))
        } else {
            State::BoolValue(false)
        }
    }

    /// Hand a boolean to the boolean consumer on top of the stack
    pub(super) fn bool_value(&mut self, value: bool) -> MachineResult<State> {
        match self.pop_consumer(FrameClass::BoolConsumer)? {
            Term::NotF => Ok(State::BoolValue(!value)),
            Term::AndL(right) => Ok(self.conjoin(value, right)),
            Term::WhileC { cond, body } => self.resume_while(value, cond, body),
            Term::IfC { then, otherwise } => Ok(self.select_branch(value, then, otherwise)),
            other => Err(Fault::illegal_frame(FrameClass::BoolConsumer, other)),
        }
    }
}
