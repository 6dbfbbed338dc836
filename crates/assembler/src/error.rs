//! Error types for the IPPcode24 loader.

use ippvm_common::{ProgramError, STRUCTURE_EXIT_CODE};
use thiserror::Error;

/// Errors produced while loading source text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// The first significant line is not `.IPPcode24`.
    #[error("line {line}: expected header '.IPPcode24'")]
    MissingHeader { line: usize },

    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode was given the wrong number of arguments.
    #[error("line {line}: {opcode} expects {expected} argument(s), found {found}")]
    WrongArgumentCount {
        line: usize,
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    /// A token does not fit the operand shape expected at its position.
    #[error("line {line}: invalid {expected} argument '{token}'")]
    InvalidArgument {
        line: usize,
        expected: &'static str,
        token: String,
    },

    /// The instruction list was rejected as a whole.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

impl AsmError {
    /// Every loader error is a lexical or structural error.
    pub fn exit_code(&self) -> i32 {
        STRUCTURE_EXIT_CODE
    }
}
