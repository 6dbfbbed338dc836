//! Parser for IPPcode24 tokens → instructions.
//!
//! Each opcode declares its operand shapes; every argument token is
//! classified against the shape at its position.

use crate::error::AsmError;
use crate::lexer::{has_valid_escapes, is_identifier};
use ippvm_common::{ArgKind, Argument, Instruction, Opcode, OperandShape, ValueType, VarRef};

/// Parse the tokens of one non-blank line into an instruction.
///
/// `order` becomes the instruction's ordering key.
pub(crate) fn parse_line(
    mnemonic: &str,
    args: &[&str],
    line_num: usize,
    order: i64,
) -> Result<Instruction, AsmError> {
    let opcode: Opcode = mnemonic.parse().map_err(|_| AsmError::UnknownOpcode {
        line: line_num,
        token: mnemonic.to_string(),
    })?;

    let shapes = opcode.operands();
    expect_count(opcode, args, shapes.len(), line_num)?;

    let args = shapes
        .iter()
        .zip(args)
        .enumerate()
        .map(|(position, (&shape, &token))| -> Result<Argument, AsmError> {
            let (kind, text) = match shape {
                OperandShape::Var => expect_var(token, line_num)?,
                OperandShape::Symb => expect_symb(token, line_num)?,
                OperandShape::Label => expect_label(token, line_num)?,
                OperandShape::Type => expect_type(token, line_num)?,
            };
            Ok(Argument::new(position, kind, text))
        })
        .collect::<Result<Vec<_>, AsmError>>()?;

    Ok(Instruction::new(order, opcode, args))
}

fn expect_count(
    opcode: Opcode,
    args: &[&str],
    expected: usize,
    line_num: usize,
) -> Result<(), AsmError> {
    if args.len() != expected {
        return Err(AsmError::WrongArgumentCount {
            line: line_num,
            opcode: opcode.mnemonic(),
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn invalid(expected: &'static str, token: &str, line_num: usize) -> AsmError {
    AsmError::InvalidArgument {
        line: line_num,
        expected,
        token: token.to_string(),
    }
}

fn expect_var<'t>(token: &'t str, line_num: usize) -> Result<(ArgKind, &'t str), AsmError> {
    match VarRef::parse(token) {
        Ok(var) if is_identifier(var.name) => Ok((ArgKind::Var, token)),
        _ => Err(invalid("var", token, line_num)),
    }
}

fn expect_symb<'t>(token: &'t str, line_num: usize) -> Result<(ArgKind, &'t str), AsmError> {
    let (prefix, text) = token
        .split_once('@')
        .ok_or_else(|| invalid("symb", token, line_num))?;
    let kind = match prefix {
        "GF" | "LF" | "TF" => return expect_var(token, line_num),
        "int" => ArgKind::Int,
        "float" => ArgKind::Float,
        "string" => ArgKind::String,
        "bool" => ArgKind::Bool,
        "nil" => ArgKind::Nil,
        _ => return Err(invalid("symb", token, line_num)),
    };
    // Escape codes are checked when the engine reads the literal.
    let valid = match kind {
        ArgKind::String => has_valid_escapes(text),
        _ => Argument::new(0, kind, text).operand().is_ok(),
    };
    if !valid {
        return Err(invalid("symb", token, line_num));
    }
    Ok((kind, text))
}

fn expect_label<'t>(token: &'t str, line_num: usize) -> Result<(ArgKind, &'t str), AsmError> {
    if !is_identifier(token) {
        return Err(invalid("label", token, line_num));
    }
    Ok((ArgKind::Label, token))
}

fn expect_type<'t>(token: &'t str, line_num: usize) -> Result<(ArgKind, &'t str), AsmError> {
    match ValueType::from_name(token) {
        Some(ty) if ty.is_readable() => Ok((ArgKind::Type, token)),
        _ => Err(invalid("type", token, line_num)),
    }
}
