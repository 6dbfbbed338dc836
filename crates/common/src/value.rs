//! Runtime value representation for the IPPcode24 VM.
//!
//! Values live in variables and on the value stack. Literal operands are
//! turned into ephemeral values when an instruction resolves them.

use crate::literal::{encode_escapes, format_float};
use crate::value_type::ValueType;

/// Runtime value representation.
///
/// The variant is authoritative: operations check it before use and never
/// infer a type from the content.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// IEEE 754 64-bit float.
    Float(f64),
    /// String with escape sequences already decoded.
    Str(String),
    /// Boolean value.
    Bool(bool),
    /// The nil value.
    Nil,
}

// Float equality is bitwise, so Value can implement Eq. The language has
// no float comparison opcode that would observe the difference.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::String,
            Value::Bool(_) => ValueType::Bool,
            Value::Nil => ValueType::Nil,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// Source notation: `int@5`, `string@a\032b`, `nil@nil`.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "int@{v}"),
            Value::Float(v) => write!(f, "float@{}", format_float(*v)),
            Value::Str(s) => write!(f, "string@{}", encode_escapes(s)),
            Value::Bool(b) => write!(f, "bool@{b}"),
            Value::Nil => f.write_str("nil@nil"),
        }
    }
}
