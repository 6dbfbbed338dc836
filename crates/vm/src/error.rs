//! Runtime errors for the IPPcode24 engine.
//!
//! Every error carries the sequence index (`at`) of the instruction that
//! failed. [`RuntimeError::kind`] classifies an error into an [`ErrorKind`],
//! which determines the process exit code.

use ippvm_common::{ArgKind, FrameKind, Opcode, OperandShape, ProgramError, ValueType};
use thiserror::Error;

/// Failure classes, one per exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed instruction, argument or literal.
    Structure,
    /// Undefined label, label or variable redefinition.
    Semantic,
    /// Operand of the wrong type.
    OperandType,
    /// Variable undeclared, or read before assignment.
    UndefinedVariable,
    /// Local or temporary frame does not exist.
    FrameAccess,
    /// Pop from an empty call or value stack.
    MissingValue,
    /// Operand of the right type but a bad value.
    OperandValue,
    /// String index or escape problem.
    StringOperation,
    /// State the type contracts should have excluded.
    Internal,
}

impl ErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Structure => 32,
            ErrorKind::Semantic => 52,
            ErrorKind::OperandType => 53,
            ErrorKind::UndefinedVariable => 54,
            ErrorKind::FrameAccess => 55,
            ErrorKind::MissingValue => 56,
            ErrorKind::OperandValue => 57,
            ErrorKind::StringOperation => 58,
            ErrorKind::Internal => 99,
        }
    }
}

/// Errors that end a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Argument text does not match its declared kind.
    #[error("instruction {at}: {source}")]
    Malformed { at: usize, source: ProgramError },

    #[error("{opcode} expects {expected} argument(s), found {found} at instruction {at}")]
    WrongArity {
        at: usize,
        opcode: Opcode,
        expected: usize,
        found: usize,
    },

    #[error("{opcode} argument {position} must be {expected:?}, found {found} at instruction {at}")]
    WrongOperand {
        at: usize,
        opcode: Opcode,
        position: usize,
        expected: OperandShape,
        found: ArgKind,
    },

    /// READ asked for `nil` or `type`.
    #[error("cannot read a value of type {ty} at instruction {at}")]
    UnreadableType { at: usize, ty: ValueType },

    #[error("undefined label '{label}' at instruction {at}")]
    UndefinedLabel { at: usize, label: String },

    #[error("label '{label}' redefined at instruction {at} (first defined at {first})")]
    LabelRedefined {
        at: usize,
        label: String,
        first: usize,
    },

    #[error("variable {var} redeclared at instruction {at}")]
    VariableRedeclared { at: usize, var: String },

    #[error("{opcode} cannot take operands of type {} at instruction {at}", type_list(.found))]
    TypeMismatch {
        at: usize,
        opcode: Opcode,
        found: Vec<ValueType>,
    },

    #[error("variable {var} is not declared at instruction {at}")]
    UndeclaredVariable { at: usize, var: String },

    #[error("variable {var} has no value at instruction {at}")]
    UninitializedVariable { at: usize, var: String },

    #[error("frame {frame} does not exist at instruction {at}")]
    FrameNotAvailable { at: usize, frame: FrameKind },

    #[error("RETURN with empty call stack at instruction {at}")]
    EmptyCallStack { at: usize },

    #[error("POPS with empty value stack at instruction {at}")]
    EmptyValueStack { at: usize },

    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    #[error("exit code {code} outside 0..=9 at instruction {at}")]
    ExitCodeOutOfRange { at: usize, code: i64 },

    #[error("string index {index} out of range (length {length}) at instruction {at}")]
    IndexOutOfRange { at: usize, index: i64, length: usize },

    #[error("{code} is not a Unicode code point at instruction {at}")]
    InvalidCodePoint { at: usize, code: i64 },

    #[error("invalid escape sequence in '{text}' at instruction {at}")]
    InvalidEscape { at: usize, text: String },

    #[error("SETCHAR with empty source string at instruction {at}")]
    EmptyReplacement { at: usize },

    #[error("output failed at instruction {at}: {message}")]
    Output { at: usize, message: String },

    #[error("internal error at instruction {at}: {message}")]
    Internal { at: usize, message: &'static str },
}

fn type_list(types: &[ValueType]) -> String {
    types
        .iter()
        .map(ValueType::name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::Malformed { .. }
            | RuntimeError::WrongArity { .. }
            | RuntimeError::WrongOperand { .. }
            | RuntimeError::UnreadableType { .. } => ErrorKind::Structure,
            RuntimeError::UndefinedLabel { .. }
            | RuntimeError::LabelRedefined { .. }
            | RuntimeError::VariableRedeclared { .. } => ErrorKind::Semantic,
            RuntimeError::TypeMismatch { .. } => ErrorKind::OperandType,
            RuntimeError::UndeclaredVariable { .. } | RuntimeError::UninitializedVariable { .. } => {
                ErrorKind::UndefinedVariable
            }
            RuntimeError::FrameNotAvailable { .. } => ErrorKind::FrameAccess,
            RuntimeError::EmptyCallStack { .. } | RuntimeError::EmptyValueStack { .. } => {
                ErrorKind::MissingValue
            }
            RuntimeError::DivisionByZero { .. } | RuntimeError::ExitCodeOutOfRange { .. } => {
                ErrorKind::OperandValue
            }
            RuntimeError::IndexOutOfRange { .. }
            | RuntimeError::InvalidCodePoint { .. }
            | RuntimeError::InvalidEscape { .. }
            | RuntimeError::EmptyReplacement { .. } => ErrorKind::StringOperation,
            RuntimeError::Output { .. } | RuntimeError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }

    /// Sequence index of the failing instruction.
    pub fn at(&self) -> usize {
        match self {
            RuntimeError::Malformed { at, .. }
            | RuntimeError::WrongArity { at, .. }
            | RuntimeError::WrongOperand { at, .. }
            | RuntimeError::UnreadableType { at, .. }
            | RuntimeError::UndefinedLabel { at, .. }
            | RuntimeError::LabelRedefined { at, .. }
            | RuntimeError::VariableRedeclared { at, .. }
            | RuntimeError::TypeMismatch { at, .. }
            | RuntimeError::UndeclaredVariable { at, .. }
            | RuntimeError::UninitializedVariable { at, .. }
            | RuntimeError::FrameNotAvailable { at, .. }
            | RuntimeError::EmptyCallStack { at }
            | RuntimeError::EmptyValueStack { at }
            | RuntimeError::DivisionByZero { at }
            | RuntimeError::ExitCodeOutOfRange { at, .. }
            | RuntimeError::IndexOutOfRange { at, .. }
            | RuntimeError::InvalidCodePoint { at, .. }
            | RuntimeError::InvalidEscape { at, .. }
            | RuntimeError::EmptyReplacement { at }
            | RuntimeError::Output { at, .. }
            | RuntimeError::Internal { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats() {
        assert_eq!(
            RuntimeError::DivisionByZero { at: 5 }.to_string(),
            "division by zero at instruction 5"
        );
        assert_eq!(
            RuntimeError::TypeMismatch {
                at: 2,
                opcode: Opcode::Add,
                found: vec![ValueType::Int, ValueType::String],
            }
            .to_string(),
            "ADD cannot take operands of type int, string at instruction 2"
        );
        assert_eq!(
            RuntimeError::FrameNotAvailable {
                at: 0,
                frame: FrameKind::Temporary
            }
            .to_string(),
            "frame TF does not exist at instruction 0"
        );
        assert_eq!(
            RuntimeError::Malformed {
                at: 1,
                source: ProgramError::InvalidVariable("x".into())
            }
            .to_string(),
            "instruction 1: invalid variable 'x'"
        );
    }

    #[test]
    fn exit_codes() {
        let cases = [
            (RuntimeError::UnreadableType { at: 0, ty: ValueType::Nil }, 32),
            (RuntimeError::UndefinedLabel { at: 0, label: "l".into() }, 52),
            (
                RuntimeError::TypeMismatch {
                    at: 0,
                    opcode: Opcode::Not,
                    found: vec![ValueType::Nil],
                },
                53,
            ),
            (RuntimeError::UninitializedVariable { at: 0, var: "GF@x".into() }, 54),
            (
                RuntimeError::FrameNotAvailable {
                    at: 0,
                    frame: FrameKind::Local,
                },
                55,
            ),
            (RuntimeError::EmptyCallStack { at: 0 }, 56),
            (RuntimeError::ExitCodeOutOfRange { at: 0, code: 10 }, 57),
            (RuntimeError::EmptyReplacement { at: 0 }, 58),
            (RuntimeError::Internal { at: 0, message: "x" }, 99),
        ];
        for (err, code) in cases {
            assert_eq!(err.exit_code(), code, "{err}");
        }
    }

    #[test]
    fn at_is_reported() {
        assert_eq!(RuntimeError::EmptyValueStack { at: 17 }.at(), 17);
        assert_eq!(
            RuntimeError::IndexOutOfRange {
                at: 3,
                index: 9,
                length: 2
            }
            .at(),
            3
        );
    }
}
