//! Term model
//!
//! - `opcodes`: tag numbering, arity and mnemonics
//! - `node`: the `Term` sum type shared by programs and continuation frames
//! - `arena`: append-only storage and the program constructor operations

mod arena;
mod node;
mod opcodes;

pub use arena::TermArena;
pub use node::{FrameClass, Term, TermHandle, VarId};
pub use opcodes::Opcode;
