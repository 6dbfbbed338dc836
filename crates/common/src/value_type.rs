//! Value type names for the IPPcode24 type system.
//!
//! The language has five data types. Every runtime value has exactly one.

/// Identifies the type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Signed 64-bit integer.
    Int,
    /// IEEE 754 64-bit float.
    Float,
    /// Unicode string.
    String,
    /// Boolean.
    Bool,
    /// The single `nil` value.
    Nil,
}

/// All value types, in definition order.
pub const ALL_VALUE_TYPES: [ValueType; 5] = [
    ValueType::Int,
    ValueType::Float,
    ValueType::String,
    ValueType::Bool,
    ValueType::Nil,
];

impl ValueType {
    /// Returns the source-notation name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Nil => "nil",
        }
    }

    /// Look up a type by its source-notation name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_VALUE_TYPES.iter().find(|t| t.name() == name).copied()
    }

    /// True for the types `READ` may request from the input stream.
    pub fn is_readable(&self) -> bool {
        matches!(
            self,
            ValueType::Int | ValueType::Float | ValueType::String | ValueType::Bool
        )
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
