//! Term arena
//!
//! Append-only storage for program terms. Handles are indices and stay valid
//! for the lifetime of the arena; nothing is ever removed or moved.

use std::fmt::Write as _;

use tracing::debug;

use super::node::{Term, TermHandle, VarId};
use crate::backend::machine::{Fault, MachineResult};

/// Fixed-capacity, append-only term store.
#[derive(Debug, Clone)]
pub struct TermArena {
    terms: Vec<Term>,
    capacity: usize,
}

impl TermArena {
    /// Create an arena that can hold at most `capacity` terms.
    ///
    /// Storage grows with each allocation; `capacity` is only a limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            terms: Vec::new(),
            capacity,
        }
    }

    /// Append a term and return its handle.
    ///
    /// Fails with `ArenaExhausted` once the capacity is reached; the arena is
    /// left unchanged in that case.
    pub fn alloc(&mut self, term: Term) -> MachineResult<TermHandle> {
        let index = self.terms.len();
        if index >= self.capacity || index > u32::MAX as usize {
            debug!(
                target: "imp_machine::arena",
                capacity = self.capacity,
                %term,
                "arena exhausted"
            );
            return Err(Fault::arena_exhausted(self.capacity, term));
        }
        self.terms.push(term);
        Ok(TermHandle::new(index as u32))
    }

    /// Dereference a handle produced by this arena.
    ///
    /// # Panics
    /// Panics if the handle did not come from this arena.
    #[inline]
    pub fn term_at(&self, handle: TermHandle) -> Term {
        self.terms[handle.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over `(handle, term)` pairs in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (TermHandle, Term)> + '_ {
        self.terms
            .iter()
            .enumerate()
            .map(|(i, t)| (TermHandle::new(i as u32), *t))
    }

    /// Render every allocated node as `[ix] = <term>` lines
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (handle, term) in self.iter() {
            let _ = writeln!(out, "[{:>2}] = {}", handle.index(), term);
        }
        out
    }

    // === Arithmetic expressions ===

    pub fn con(&mut self, value: i64) -> MachineResult<TermHandle> {
        self.alloc(Term::ACon(value))
    }

    pub fn var(&mut self, id: VarId) -> MachineResult<TermHandle> {
        self.alloc(Term::AVar(id))
    }

    pub fn add(&mut self, left: TermHandle, right: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Add(left, right))
    }

    pub fn div(&mut self, left: TermHandle, right: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Div(left, right))
    }

    // === Boolean expressions ===

    pub fn boolean(&mut self, value: bool) -> MachineResult<TermHandle> {
        self.alloc(Term::BCon(value))
    }

    pub fn le(&mut self, left: TermHandle, right: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Le(left, right))
    }

    pub fn not(&mut self, operand: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Not(operand))
    }

    pub fn and(&mut self, left: TermHandle, right: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::And(left, right))
    }

    // === Statements ===

    pub fn skip(&mut self) -> MachineResult<TermHandle> {
        self.alloc(Term::Skip)
    }

    pub fn assign(&mut self, expr: TermHandle, var: VarId) -> MachineResult<TermHandle> {
        self.alloc(Term::Assign { expr, var })
    }

    pub fn seq(&mut self, first: TermHandle, second: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Seq(first, second))
    }

    pub fn if_then_else(
        &mut self,
        cond: TermHandle,
        then: TermHandle,
        otherwise: TermHandle,
    ) -> MachineResult<TermHandle> {
        self.alloc(Term::If { cond, then, otherwise })
    }

    pub fn while_do(&mut self, cond: TermHandle, body: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::While { cond, body })
    }

    /// Reserved heap indirection; no evaluator accepts it yet
    pub fn indirect(&mut self, target: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Ind(target))
    }

    /// Right-nested sequence of `stmts`, `skip` when empty
    pub fn seq_all(&mut self, stmts: &[TermHandle]) -> MachineResult<TermHandle> {
        match stmts.split_last() {
            None => self.skip(),
            Some((&last, init)) => init
                .iter()
                .rev()
                .try_fold(last, |rest, &stmt| self.seq(stmt, rest)),
        }
    }

    // === Programs ===

    pub fn nil(&mut self) -> MachineResult<TermHandle> {
        self.alloc(Term::Nil)
    }

    pub fn cons(&mut self, head: TermHandle, tail: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Cons { head, tail })
    }

    /// Build a `cons`/`nil` list of variable references
    pub fn var_list(&mut self, ids: &[VarId]) -> MachineResult<TermHandle> {
        let heads = ids
            .iter()
            .map(|&id| self.var(id))
            .collect::<MachineResult<Vec<_>>>()?;
        let nil = self.nil()?;
        heads
            .into_iter()
            .rev()
            .try_fold(nil, |tail, head| self.cons(head, tail))
    }

    pub fn program(&mut self, vars: TermHandle, body: TermHandle) -> MachineResult<TermHandle> {
        self.alloc(Term::Pgm { vars, body })
    }
}
