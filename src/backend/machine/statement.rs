//! Statement transitions for the dispatch engine.
//!
//! Program entry, statement dispatch and the two statement-level consumers
//! (`WhileC` and `IfC`) that resume once a condition has been decided.

use crate::backend::term::{Term, TermHandle};
use super::types::{Fault, MachineResult, State};
use super::Machine;

impl Machine<'_> {
    /// Declare one variable of the list, or start the body at `Nil`
    pub(super) fn program_entry(&mut self, vars: Term, body: Term) -> MachineResult<State> {
        match vars {
            Term::Cons { head, tail } => {
                match self.term(head) {
                    Term::AVar(id) => self.store.declare(id)?,
                    other => return Err(Fault::unrecognized("variable declaration", other)),
                }
                Ok(State::ProgramEntry {
                    vars: self.term(tail),
                    body,
                })
            }
            Term::Nil => Ok(State::Statement(body)),
            other => Err(Fault::unrecognized("variable list", other)),
        }
    }

    pub(super) fn statement(&mut self, term: Term) -> MachineResult<State> {
        match term {
            Term::Skip => Ok(State::NextStatement),

            Term::Seq(first, second) => {
                let second = self.term(second);
                self.push_statement(second)?;
                Ok(State::Statement(self.term(first)))
            }

            Term::Assign { expr, var } => {
                let expr = self.term(expr);
                match self.immediate_arith(expr)? {
                    Some(value) => {
                        self.store.set(var, value)?;
                        Ok(State::NextStatement)
                    }
                    None => {
                        self.push(Term::AssignR(var))?;
                        Ok(State::ArithPending(expr))
                    }
                }
            }

            Term::If { cond, then, otherwise } => match self.term(cond) {
                Term::BCon(value) => Ok(self.select_branch(value, then, otherwise)),
                cond => {
                    self.push(Term::IfC { then, otherwise })?;
                    Ok(State::BoolPending(cond))
                }
            },

            Term::While { cond, body } => match self.term(cond) {
                Term::BCon(value) => self.resume_while(value, cond, body),
                cond_term => {
                    self.push(Term::WhileC { cond, body })?;
                    Ok(State::BoolPending(cond_term))
                }
            },

            other => Err(Fault::unrecognized("statement", other)),
        }
    }

    /// A loop condition has been decided.
    ///
    /// On `true` the loop itself is pushed back as a pending statement so it
    /// is re-tested once the body finishes.
    pub(super) fn resume_while(
        &mut self,
        value: bool,
        cond: TermHandle,
        body: TermHandle,
    ) -> MachineResult<State> {
        if value {
            self.push_statement(Term::While { cond, body })?;
            Ok(State::Statement(self.term(body)))
        } else {
            Ok(State::NextStatement)
        }
    }

    pub(super) fn select_branch(
        &self,
        value: bool,
        then: TermHandle,
        otherwise: TermHandle,
    ) -> State {
        let branch = if value { then } else { otherwise };
        State::Statement(self.term(branch))
    }
}
