//! Instruction arguments and their resolved operand form.
//!
//! An [`Argument`] is what the source loader hands over: a position, a
//! declared kind and the raw text. [`Argument::operand`] validates the text
//! against the kind and produces an [`Operand`] the engine can act on.

use crate::error::ProgramError;
use crate::literal::{decode_escapes, parse_bool, parse_float, parse_int};
use crate::opcode::OperandShape;
use crate::value::Value;
use crate::value_type::ValueType;

/// Declared kind of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Var,
    Label,
    Type,
    Int,
    Float,
    String,
    Bool,
    Nil,
}

impl ArgKind {
    pub fn name(&self) -> &'static str {
        match self {
            ArgKind::Var => "var",
            ArgKind::Label => "label",
            ArgKind::Type => "type",
            ArgKind::Int => "int",
            ArgKind::Float => "float",
            ArgKind::String => "string",
            ArgKind::Bool => "bool",
            ArgKind::Nil => "nil",
        }
    }

    /// True for the constant kinds (`int`, `float`, `string`, `bool`, `nil`).
    pub fn is_literal(&self) -> bool {
        !matches!(self, ArgKind::Var | ArgKind::Label | ArgKind::Type)
    }

    /// Whether an argument of this kind may appear where `shape` is expected.
    pub fn fits(&self, shape: OperandShape) -> bool {
        match shape {
            OperandShape::Var => *self == ArgKind::Var,
            OperandShape::Symb => *self == ArgKind::Var || self.is_literal(),
            OperandShape::Label => *self == ArgKind::Label,
            OperandShape::Type => *self == ArgKind::Type,
        }
    }
}

impl std::fmt::Display for ArgKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which frame a variable reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Global,
    Local,
    Temporary,
}

impl FrameKind {
    /// The two-letter prefix used in source notation.
    pub fn prefix(&self) -> &'static str {
        match self {
            FrameKind::Global => "GF",
            FrameKind::Local => "LF",
            FrameKind::Temporary => "TF",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "GF" => Some(FrameKind::Global),
            "LF" => Some(FrameKind::Local),
            "TF" => Some(FrameKind::Temporary),
            _ => None,
        }
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A parsed variable reference such as `LF@counter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarRef<'a> {
    pub frame: FrameKind,
    pub name: &'a str,
}

impl<'a> VarRef<'a> {
    /// Split `GF@name` into its frame and name parts.
    pub fn parse(text: &'a str) -> Result<Self, ProgramError> {
        let invalid = || ProgramError::InvalidVariable(text.to_string());
        let (prefix, name) = text.split_once('@').ok_or_else(invalid)?;
        let frame = FrameKind::from_prefix(prefix).ok_or_else(invalid)?;
        if name.is_empty() {
            return Err(invalid());
        }
        Ok(VarRef { frame, name })
    }
}

impl std::fmt::Display for VarRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.frame, self.name)
    }
}

/// An argument after its text has been validated against its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand<'a> {
    Var(VarRef<'a>),
    /// An ephemeral value built from literal text.
    Literal(Value),
    Label(&'a str),
    Type(ValueType),
}

/// One positional argument of an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// Zero-based position; 0 is the destination when there is one.
    pub position: usize,
    pub kind: ArgKind,
    /// Raw text. For literals this is the part after `kind@`.
    pub text: String,
}

impl Argument {
    pub fn new(position: usize, kind: ArgKind, text: impl Into<String>) -> Self {
        Self {
            position,
            kind,
            text: text.into(),
        }
    }

    /// Validate the text against the declared kind.
    ///
    /// Malformed text is a [`ProgramError`]. String literals have their
    /// `\DDD` escapes decoded here; a bad escape is
    /// [`ProgramError::InvalidEscape`].
    pub fn operand(&self) -> Result<Operand<'_>, ProgramError> {
        let invalid = || ProgramError::InvalidLiteral {
            kind: self.kind,
            text: self.text.clone(),
        };
        let operand = match self.kind {
            ArgKind::Var => Operand::Var(VarRef::parse(&self.text)?),
            ArgKind::Label => {
                if self.text.is_empty() {
                    return Err(invalid());
                }
                Operand::Label(&self.text)
            }
            ArgKind::Type => Operand::Type(
                ValueType::from_name(&self.text)
                    .ok_or_else(|| ProgramError::InvalidTypeName(self.text.clone()))?,
            ),
            ArgKind::Int => Operand::Literal(Value::Int(parse_int(&self.text).ok_or_else(invalid)?)),
            ArgKind::Float => {
                Operand::Literal(Value::Float(parse_float(&self.text).ok_or_else(invalid)?))
            }
            ArgKind::String => Operand::Literal(Value::Str(
                decode_escapes(&self.text)
                    .ok_or_else(|| ProgramError::InvalidEscape(self.text.clone()))?,
            )),
            ArgKind::Bool => {
                Operand::Literal(Value::Bool(parse_bool(&self.text).ok_or_else(invalid)?))
            }
            ArgKind::Nil => {
                if self.text != "nil" {
                    return Err(invalid());
                }
                Operand::Literal(Value::Nil)
            }
        };
        Ok(operand)
    }
}

/// Source notation: variables, labels and types as written, literals as `kind@text`.
impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.kind.is_literal() {
            write!(f, "{}@{}", self.kind, self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}
