//! Continuation stack.
//!
//! One homogeneous stack of [`Term`] frames carries both pending statements
//! and reified expression contexts. The capacity is a fixed limit set when the
//! stack is created; storage is only allocated as frames are pushed.

use std::fmt;

use crate::backend::term::Term;
use super::types::{Fault, MachineResult};

#[derive(Debug, Clone)]
pub struct ContinuationStack {
    frames: Vec<Term>,
    capacity: usize,
}

impl ContinuationStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::new(),
            capacity,
        }
    }

    #[inline]
    pub fn push(&mut self, frame: Term) -> MachineResult<()> {
        if self.frames.len() >= self.capacity {
            return Err(Fault::stack_exhausted(self.capacity, frame));
        }
        self.frames.push(frame);
        Ok(())
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Term> {
        self.frames.pop()
    }

    #[inline]
    pub fn peek(&self) -> Option<&Term> {
        self.frames.last()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Frames from top to bottom
    pub fn iter(&self) -> impl Iterator<Item = &Term> {
        self.frames.iter().rev()
    }
}

/// Renders the frames top first, each followed by ` ~> `.
impl fmt::Display for ContinuationStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.iter() {
            write!(f, "{} ~> ", frame)?;
        }
        Ok(())
    }
}
