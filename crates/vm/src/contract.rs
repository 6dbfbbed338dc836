//! Operand contracts: argument shapes per opcode, and the type table for
//! every value-producing operation.
//!
//! Handlers resolve their operands to values and call into this module;
//! nothing here touches frames or stacks. A function either returns the
//! result or fails without side effects.

use crate::error::RuntimeError;
use ippvm_common::{Instruction, Opcode, Value, ValueType};
use std::cmp::Ordering;

/// Check argument count and argument kinds against the opcode's signature.
pub(crate) fn check_signature(instr: &Instruction, at: usize) -> Result<(), RuntimeError> {
    let shapes = instr.opcode.operands();
    if instr.args.len() != shapes.len() {
        return Err(RuntimeError::WrongArity {
            at,
            opcode: instr.opcode,
            expected: shapes.len(),
            found: instr.args.len(),
        });
    }
    for (position, (arg, &shape)) in instr.args.iter().zip(shapes).enumerate() {
        if !arg.kind.fits(shape) {
            return Err(RuntimeError::WrongOperand {
                at,
                opcode: instr.opcode,
                position,
                expected: shape,
                found: arg.kind,
            });
        }
    }
    Ok(())
}

fn mismatch(opcode: Opcode, at: usize, operands: &[&Value]) -> RuntimeError {
    RuntimeError::TypeMismatch {
        at,
        opcode,
        found: operands.iter().map(|v| v.value_type()).collect(),
    }
}

/// Evaluate a value-producing opcode over resolved operand values.
///
/// | Opcode            | Operands                     | Result  |
/// |-------------------|------------------------------|---------|
/// | ADD SUB MUL IDIV  | int, int                     | int     |
/// | LT GT             | same type, not nil           | bool    |
/// | EQ                | same type, or either nil     | bool    |
/// | AND OR            | bool, bool                   | bool    |
/// | NOT               | bool                         | bool    |
/// | CONCAT            | string, string               | string  |
/// | STRLEN            | string                       | int     |
/// | GETCHAR           | string, int                  | string  |
/// | STRI2INT          | string, int                  | int     |
/// | INT2CHAR          | int                          | string  |
/// | SETCHAR           | string (current), int, string| string  |
///
/// Integer arithmetic wraps on overflow.
pub fn apply(opcode: Opcode, operands: &[&Value], at: usize) -> Result<Value, RuntimeError> {
    let fail = || mismatch(opcode, at, operands);
    match (opcode, operands) {
        (Opcode::Add, [Value::Int(a), Value::Int(b)]) => Ok(Value::Int(a.wrapping_add(*b))),
        (Opcode::Sub, [Value::Int(a), Value::Int(b)]) => Ok(Value::Int(a.wrapping_sub(*b))),
        (Opcode::Mul, [Value::Int(a), Value::Int(b)]) => Ok(Value::Int(a.wrapping_mul(*b))),
        (Opcode::Idiv, [Value::Int(_), Value::Int(0)]) => Err(RuntimeError::DivisionByZero { at }),
        (Opcode::Idiv, [Value::Int(a), Value::Int(b)]) => Ok(Value::Int(a.wrapping_div(*b))),

        (Opcode::Lt | Opcode::Gt, [a, b]) => {
            let ordering = compare(a, b).ok_or_else(fail)?;
            let wanted = if opcode == Opcode::Lt {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            Ok(Value::Bool(ordering == Some(wanted)))
        }
        (Opcode::Eq, [a, b]) => equals(opcode, a, b, at).map(Value::Bool),

        (Opcode::And, [Value::Bool(a), Value::Bool(b)]) => Ok(Value::Bool(*a && *b)),
        (Opcode::Or, [Value::Bool(a), Value::Bool(b)]) => Ok(Value::Bool(*a || *b)),
        (Opcode::Not, [Value::Bool(a)]) => Ok(Value::Bool(!a)),

        (Opcode::Concat, [Value::Str(a), Value::Str(b)]) => Ok(Value::Str(format!("{a}{b}"))),
        (Opcode::Strlen, [Value::Str(s)]) => Ok(Value::Int(s.chars().count() as i64)),
        (Opcode::Getchar, [Value::Str(s), Value::Int(index)]) => {
            let c = char_at(s, *index, at)?;
            Ok(Value::Str(c.to_string()))
        }
        (Opcode::Stri2Int, [Value::Str(s), Value::Int(index)]) => {
            let c = char_at(s, *index, at)?;
            Ok(Value::Int(c as i64))
        }
        (Opcode::Int2Char, [Value::Int(code)]) => u32::try_from(*code)
            .ok()
            .and_then(char::from_u32)
            .map(|c| Value::Str(c.to_string()))
            .ok_or(RuntimeError::InvalidCodePoint { at, code: *code }),
        (Opcode::Setchar, [Value::Str(s), Value::Int(index), Value::Str(source)]) => {
            let replacement = source
                .chars()
                .next()
                .ok_or(RuntimeError::EmptyReplacement { at })?;
            let position = char_index(s, *index, at)?;
            let result = s
                .chars()
                .enumerate()
                .map(|(i, c)| if i == position { replacement } else { c })
                .collect();
            Ok(Value::Str(result))
        }

        _ => Err(fail()),
    }
}

/// Ordering for `LT`/`GT`: defined between two values of the same
/// comparable type. `Some(None)` is an unordered float pair (NaN).
fn compare(a: &Value, b: &Value) -> Option<Option<Ordering>> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(Some(a.cmp(b))),
        (Value::Float(a), Value::Float(b)) => Some(a.partial_cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(Some(a.cmp(b))),
        (Value::Bool(a), Value::Bool(b)) => Some(Some(a.cmp(b))),
        _ => None,
    }
}

/// Equality for `EQ`, `JUMPIFEQ` and `JUMPIFNEQ`.
///
/// Both operands must share a type, except that `nil` compares against
/// anything: nil equals only nil.
pub fn equals(opcode: Opcode, a: &Value, b: &Value, at: usize) -> Result<bool, RuntimeError> {
    match (a, b) {
        (Value::Nil, _) | (_, Value::Nil) => Ok(a.is_nil() && b.is_nil()),
        (Value::Float(x), Value::Float(y)) => Ok(x == y),
        _ if a.value_type() == b.value_type() => Ok(a == b),
        _ => Err(mismatch(opcode, at, &[a, b])),
    }
}

/// Validate an `EXIT` operand: an int in 0..=9.
pub fn exit_status(value: &Value, at: usize) -> Result<u8, RuntimeError> {
    match value {
        Value::Int(code @ 0..=9) => Ok(*code as u8),
        Value::Int(code) => Err(RuntimeError::ExitCodeOutOfRange { at, code: *code }),
        other => Err(mismatch(Opcode::Exit, at, &[other])),
    }
}

/// Result of `TYPE`: the type name, or the empty string for an undefined variable.
pub fn type_name(value: Option<&Value>) -> Value {
    match value {
        Some(v) => Value::Str(v.value_type().name().to_string()),
        None => Value::Str(String::new()),
    }
}

/// Check that `READ` may produce a value of `ty`.
pub fn readable(ty: ValueType, at: usize) -> Result<ValueType, RuntimeError> {
    if ty.is_readable() {
        Ok(ty)
    } else {
        Err(RuntimeError::UnreadableType { at, ty })
    }
}

fn char_index(s: &str, index: i64, at: usize) -> Result<usize, RuntimeError> {
    let length = s.chars().count();
    match usize::try_from(index) {
        Ok(i) if i < length => Ok(i),
        _ => Err(RuntimeError::IndexOutOfRange { at, index, length }),
    }
}

fn char_at(s: &str, index: i64, at: usize) -> Result<char, RuntimeError> {
    let position = char_index(s, index, at)?;
    s.chars().nth(position).ok_or(RuntimeError::Internal {
        at,
        message: "character index checked but missing",
    })
}
