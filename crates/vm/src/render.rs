//! Output rendering for `WRITE` and `DPRINT`.

use ippvm_common::literal::format_float;
use ippvm_common::Value;

/// Text written for a value. Nil renders as nothing.
pub fn render(value: &Value) -> String {
    match value {
        Value::Int(v) => v.to_string(),
        Value::Float(v) => format_float(*v),
        Value::Str(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Nil => String::new(),
    }
}
