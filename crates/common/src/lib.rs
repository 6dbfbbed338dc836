//! IPPcode24 common types.
//!
//! This crate provides the data structures shared by the loader and the
//! engine:
//!
//! - [`Opcode`]: the 35 opcodes and their operand signatures
//! - [`Value`] / [`ValueType`]: runtime values and their types
//! - [`Argument`] / [`Operand`]: raw instruction arguments and their validated form
//! - [`Instruction`] / [`Program`]: the ordered instruction sequence
//! - [`ProgramError`]: structural errors (exit code 32)
//!
//! Literal parsing and float notation live in [`literal`].

pub mod argument;
pub mod error;
pub mod instruction;
pub mod literal;
pub mod opcode;
pub mod program;
pub mod value;
pub mod value_type;

// Re-export commonly used types at the crate root.
pub use argument::{ArgKind, Argument, FrameKind, Operand, VarRef};
pub use error::{ProgramError, STRUCTURE_EXIT_CODE};
pub use instruction::Instruction;
pub use opcode::{Opcode, OperandShape};
pub use program::Program;
pub use value::Value;
pub use value_type::ValueType;
