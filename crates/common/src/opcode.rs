//! Opcode definitions for the IPPcode24 instruction set.
//!
//! Each opcode carries its operand signature, which both the source loader
//! and the engine use to validate argument shapes.

use crate::error::ProgramError;
use std::str::FromStr;

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Frames and function calls
    /// Copy a value into a variable.
    Move,
    /// Replace the temporary frame with a fresh empty one.
    CreateFrame,
    /// Move the temporary frame onto the local frame stack.
    PushFrame,
    /// Move the top local frame into the temporary frame slot.
    PopFrame,
    /// Declare an undefined variable.
    Defvar,
    /// Save the return position and jump to a label.
    Call,
    /// Jump back to the last saved return position.
    Return,

    // Value stack
    /// Push a copy of a value.
    Pushs,
    /// Pop a value into a variable.
    Pops,

    // Arithmetic, relational, boolean and conversion
    Add,
    Sub,
    Mul,
    /// Integer division; dividing by zero is an operand value error.
    Idiv,
    Lt,
    Gt,
    Eq,
    And,
    Or,
    Not,
    /// Unicode code point to a one-character string.
    Int2Char,
    /// Code point of the character at an index.
    Stri2Int,

    // Input / output
    Read,
    Write,

    // Strings
    Concat,
    Strlen,
    Getchar,
    Setchar,

    // Types
    /// Store the type name of a symbol as a string.
    Type,

    // Program flow
    Label,
    Jump,
    JumpIfEq,
    JumpIfNeq,
    /// Stop the program with an exit code in 0..=9.
    Exit,

    // Debugging
    /// Write a value to the diagnostic stream.
    Dprint,
    /// Dump interpreter state to the diagnostic stream.
    Break,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 35] = [
    Opcode::Move,
    Opcode::CreateFrame,
    Opcode::PushFrame,
    Opcode::PopFrame,
    Opcode::Defvar,
    Opcode::Call,
    Opcode::Return,
    Opcode::Pushs,
    Opcode::Pops,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Idiv,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::Eq,
    Opcode::And,
    Opcode::Or,
    Opcode::Not,
    Opcode::Int2Char,
    Opcode::Stri2Int,
    Opcode::Read,
    Opcode::Write,
    Opcode::Concat,
    Opcode::Strlen,
    Opcode::Getchar,
    Opcode::Setchar,
    Opcode::Type,
    Opcode::Label,
    Opcode::Jump,
    Opcode::JumpIfEq,
    Opcode::JumpIfNeq,
    Opcode::Exit,
    Opcode::Dprint,
    Opcode::Break,
];

/// The shape an argument must have at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// A variable reference (`GF@x`).
    Var,
    /// A variable reference or a literal.
    Symb,
    /// A label name.
    Label,
    /// A type name (`int`, `string`, ...).
    Type,
}

use OperandShape::{Label as L, Symb as S, Type as T, Var as V};

impl Opcode {
    /// Returns the source mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Move => "MOVE",
            Opcode::CreateFrame => "CREATEFRAME",
            Opcode::PushFrame => "PUSHFRAME",
            Opcode::PopFrame => "POPFRAME",
            Opcode::Defvar => "DEFVAR",
            Opcode::Call => "CALL",
            Opcode::Return => "RETURN",
            Opcode::Pushs => "PUSHS",
            Opcode::Pops => "POPS",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Idiv => "IDIV",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Eq => "EQ",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Int2Char => "INT2CHAR",
            Opcode::Stri2Int => "STRI2INT",
            Opcode::Read => "READ",
            Opcode::Write => "WRITE",
            Opcode::Concat => "CONCAT",
            Opcode::Strlen => "STRLEN",
            Opcode::Getchar => "GETCHAR",
            Opcode::Setchar => "SETCHAR",
            Opcode::Type => "TYPE",
            Opcode::Label => "LABEL",
            Opcode::Jump => "JUMP",
            Opcode::JumpIfEq => "JUMPIFEQ",
            Opcode::JumpIfNeq => "JUMPIFNEQ",
            Opcode::Exit => "EXIT",
            Opcode::Dprint => "DPRINT",
            Opcode::Break => "BREAK",
        }
    }

    /// Operand signature: the required shape of each argument, in order.
    pub fn operands(&self) -> &'static [OperandShape] {
        match self {
            Opcode::CreateFrame
            | Opcode::PushFrame
            | Opcode::PopFrame
            | Opcode::Return
            | Opcode::Break => &[],
            Opcode::Defvar | Opcode::Pops => &[V],
            Opcode::Call | Opcode::Label | Opcode::Jump => &[L],
            Opcode::Pushs | Opcode::Write | Opcode::Exit | Opcode::Dprint => &[S],
            Opcode::Move
            | Opcode::Not
            | Opcode::Int2Char
            | Opcode::Strlen
            | Opcode::Type => &[V, S],
            Opcode::Read => &[V, T],
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Idiv
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Eq
            | Opcode::And
            | Opcode::Or
            | Opcode::Stri2Int
            | Opcode::Concat
            | Opcode::Getchar
            | Opcode::Setchar => &[V, S, S],
            Opcode::JumpIfEq | Opcode::JumpIfNeq => &[L, S, S],
        }
    }

    /// Number of arguments this opcode takes.
    pub fn arity(&self) -> usize {
        self.operands().len()
    }
}

/// Mnemonics are matched case-insensitively.
impl FromStr for Opcode {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| ProgramError::UnknownOpcode(s.to_string()))
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
