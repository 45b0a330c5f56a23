//! Variable store.
//!
//! 64-bit slots indexed by [`VarId`], up to a fixed capacity. A slot must be
//! declared (zeroed by the program's variable list) before it can be read or
//! written. Slots are allocated when they are first declared.

use crate::backend::term::VarId;
use super::types::{Fault, FaultKind, MachineResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStore {
    values: Vec<i64>,
    declared: Vec<bool>,
    capacity: usize,
}

impl VariableStore {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::new(),
            declared: Vec::new(),
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Declare `id` and zero its slot
    pub fn declare(&mut self, id: VarId) -> MachineResult<()> {
        let index = id.index();
        if index >= self.capacity {
            return Err(Fault::new(
                FaultKind::UndeclaredVariable,
                format!("{} is beyond store capacity {}", id, self.capacity),
            ));
        }
        if index >= self.values.len() {
            self.grow_to(id)?;
        }
        self.values[index] = 0;
        self.declared[index] = true;
        Ok(())
    }

    /// Allocate slots up to and including `id`
    fn grow_to(&mut self, id: VarId) -> MachineResult<()> {
        let additional = id.index() + 1 - self.values.len();
        let out_of_memory =
            |_| Fault::new(FaultKind::UndeclaredVariable, format!("no memory for {}", id));
        self.values.try_reserve_exact(additional).map_err(out_of_memory)?;
        self.declared.try_reserve_exact(additional).map_err(out_of_memory)?;
        self.values.resize(id.index() + 1, 0);
        self.declared.resize(id.index() + 1, false);
        Ok(())
    }

    #[inline]
    pub fn is_declared(&self, id: VarId) -> bool {
        self.declared.get(id.index()).copied().unwrap_or(false)
    }

    #[inline]
    pub fn get(&self, id: VarId) -> MachineResult<i64> {
        self.check(id)?;
        Ok(self.values[id.index()])
    }

    #[inline]
    pub fn set(&mut self, id: VarId, value: i64) -> MachineResult<()> {
        self.check(id)?;
        self.values[id.index()] = value;
        Ok(())
    }

    /// Value of `id` if declared
    pub fn value(&self, id: VarId) -> Option<i64> {
        self.get(id).ok()
    }

    /// Forget every declaration and zero all slots
    pub fn reset(&mut self) {
        self.values.clear();
        self.declared.clear();
    }

    /// `(id, value)` for every declared variable, ascending by id
    pub fn declared_values(&self) -> impl Iterator<Item = (VarId, i64)> + '_ {
        self.values
            .iter()
            .zip(&self.declared)
            .enumerate()
            .filter(|(_, (_, declared))| **declared)
            .map(|(i, (value, _))| (VarId(i as u32), *value))
    }

    #[inline]
    fn check(&self, id: VarId) -> MachineResult<()> {
        if self.is_declared(id) {
            Ok(())
        } else {
            Err(Fault::new(
                FaultKind::UndeclaredVariable,
                format!("{} is not declared by the program", id),
            ))
        }
    }
}
