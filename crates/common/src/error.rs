//! Structural errors for IPPcode24 instruction lists.
//!
//! These are the problems an instruction list can have before any
//! instruction executes: bad ordering, unknown opcodes, malformed argument
//! text. All of them are reported with the lexical/structural exit code,
//! except a bad string escape.

use crate::argument::ArgKind;
use thiserror::Error;

/// Exit code for every lexical or structural problem.
pub const STRUCTURE_EXIT_CODE: i32 = 32;

/// Errors in the shape of an instruction list or one of its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// Opcode name not in the instruction set.
    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    /// An instruction's order is zero or negative.
    #[error("invalid instruction order {order} (must be positive)")]
    InvalidOrder { order: i64 },

    /// Two instructions share the same order.
    #[error("duplicate instruction order {order}")]
    DuplicateOrder { order: i64 },

    /// Argument positions are not exactly 0..n.
    #[error("instruction {order}: argument {position} is missing or repeated")]
    ArgumentGap { order: i64, position: usize },

    /// Literal text does not parse as its declared kind.
    #[error("invalid {kind} literal '{text}'")]
    InvalidLiteral { kind: ArgKind, text: String },

    /// Variable text is not `GF@name`, `LF@name` or `TF@name`.
    #[error("invalid variable '{0}'")]
    InvalidVariable(String),

    /// String literal with a `\DDD` escape that names no allowed character.
    /// The engine reports this as a string error rather than a structural one.
    #[error("invalid escape sequence in string literal '{0}'")]
    InvalidEscape(String),

    /// Type operand is not a known type name.
    #[error("invalid type name '{0}'")]
    InvalidTypeName(String),
}
