//! Reference evaluator
//!
//! Direct recursive big-step semantics over the same terms the dispatch
//! engine runs. It exists to check the engine: for every program both must
//! leave the same store, and both must fault on the same programs.
//!
//! A stuck configuration (unlicensed term, division by zero, undeclared
//! variable) is a [`Fault`] returned through ordinary `?` propagation up to
//! [`ReferenceEvaluator::run`]. Assignments already committed stay committed.
//!
//! Recursion depth follows the nesting depth of the program, so this is not
//! suitable for very deep terms.

use tracing::{debug, trace};

use crate::backend::machine::{Fault, MachineResult, RunOutcome, VariableStore};
use crate::backend::term::{Term, TermArena, TermHandle};

pub struct ReferenceEvaluator<'a> {
    arena: &'a TermArena,
    store: VariableStore,
}

impl<'a> ReferenceEvaluator<'a> {
    pub fn new(arena: &'a TermArena, variable_capacity: usize) -> Self {
        Self {
            arena,
            store: VariableStore::with_capacity(variable_capacity),
        }
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn into_store(self) -> VariableStore {
        self.store
    }

    /// Declare the program's variables, then execute its body
    pub fn run(&mut self, program: TermHandle) -> RunOutcome {
        self.store.reset();
        let outcome = RunOutcome::from(self.program(program));
        debug!(target: "imp_machine::reference", %outcome, "reference run finished");
        outcome
    }

    fn program(&mut self, program: TermHandle) -> MachineResult<()> {
        let Term::Pgm { vars, body } = self.term(program) else {
            return Err(Fault::unrecognized("program", self.term(program)));
        };

        let mut list = self.term(vars);
        loop {
            match list {
                Term::Cons { head, tail } => {
                    match self.term(head) {
                        Term::AVar(id) => self.store.declare(id)?,
                        other => return Err(Fault::unrecognized("variable declaration", other)),
                    }
                    list = self.term(tail);
                }
                Term::Nil => break,
                other => return Err(Fault::unrecognized("variable list", other)),
            }
        }

        self.exec(self.term(body))
    }

    fn exec(&mut self, stmt: Term) -> MachineResult<()> {
        trace!(target: "imp_machine::reference", %stmt, "exec");
        match stmt {
            Term::Skip => Ok(()),
            Term::Seq(first, second) => {
                self.exec(self.term(first))?;
                self.exec(self.term(second))
            }
            Term::If { cond, then, otherwise } => {
                if self.beval(self.term(cond))? {
                    self.exec(self.term(then))
                } else {
                    self.exec(self.term(otherwise))
                }
            }
            Term::While { cond, body } => {
                let (cond, body) = (self.term(cond), self.term(body));
                while self.beval(cond)? {
                    self.exec(body)?;
                }
                Ok(())
            }
            Term::Assign { expr, var } => {
                let value = self.aeval(self.term(expr))?;
                self.store.set(var, value)
            }
            other => Err(Fault::unrecognized("statement", other)),
        }
    }

    fn aeval(&self, expr: Term) -> MachineResult<i64> {
        match expr {
            Term::ACon(value) => Ok(value),
            Term::AVar(id) => self.store.get(id),
            Term::Add(left, right) => {
                let left = self.aeval(self.term(left))?;
                let right = self.aeval(self.term(right))?;
                Ok(left.wrapping_add(right))
            }
            Term::Div(left, right) => {
                let numerator = self.aeval(self.term(left))?;
                let denominator = self.aeval(self.term(right))?;
                if denominator == 0 {
                    return Err(Fault::division_by_zero(numerator));
                }
                Ok(numerator.wrapping_div(denominator))
            }
            other => Err(Fault::unrecognized("arithmetic expression", other)),
        }
    }

    fn beval(&self, expr: Term) -> MachineResult<bool> {
        match expr {
            Term::BCon(value) => Ok(value),
            Term::Not(operand) => Ok(!self.beval(self.term(operand))?),
            Term::And(left, right) => {
                Ok(self.beval(self.term(left))? && self.beval(self.term(right))?)
            }
            Term::Le(left, right) => {
                let left = self.aeval(self.term(left))?;
                let right = self.aeval(self.term(right))?;
                Ok(left <= right)
            }
            other => Err(Fault::unrecognized("boolean expression", other)),
        }
    }

    #[inline]
    fn term(&self, handle: TermHandle) -> Term {
        self.arena.term_at(handle)
    }
}

/// Evaluate `program` with the reference semantics
pub fn evaluate(
    arena: &TermArena,
    program: TermHandle,
    variable_capacity: usize,
) -> (RunOutcome, VariableStore) {
    let mut evaluator = ReferenceEvaluator::new(arena, variable_capacity);
    let outcome = evaluator.run(program);
    (outcome, evaluator.into_store())
}
