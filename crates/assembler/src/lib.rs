//! IPPcode24 source loader: text ↔ [`Program`] translation.
//!
//! The loader is a mechanical 1:1 translation. Each significant line becomes
//! one instruction, ordered 1, 2, 3... in source order.
//!
//! # Usage
//!
//! ```
//! use ippvm_assembler::{assemble, disassemble};
//!
//! let text = ".IPPcode24\nDEFVAR GF@x\nMOVE GF@x int@42\nWRITE GF@x\n";
//! let program = assemble(text).unwrap();
//! assert_eq!(program.len(), 3);
//! assert_eq!(disassemble(&program), text);
//! ```
//!
//! # Source format
//!
//! - `#` starts a comment that runs to end of line
//! - the first significant line must be `.IPPcode24` (any letter case)
//! - opcodes are case-insensitive; frame prefixes, literal kinds and type
//!   names are not
//! - string literals cannot contain whitespace, `#` or a bare backslash;
//!   those are written as `\ddd` decimal escapes

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use ippvm_common::Program;
use lexer::{is_header, tokenize_line};
use parser::parse_line;

/// Load source text into a program.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Program, AsmError> {
    let mut instructions = Vec::new();
    let mut seen_header = false;

    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line);
        let Some((&first, rest)) = tokens.split_first() else {
            continue;
        };

        if !seen_header {
            if !is_header(first) || !rest.is_empty() {
                return Err(AsmError::MissingHeader { line: line_num });
            }
            seen_header = true;
            continue;
        }

        let order = instructions.len() as i64 + 1;
        instructions.push(parse_line(first, rest, line_num, order)?);
    }

    if !seen_header {
        return Err(AsmError::MissingHeader {
            line: text.lines().count().max(1),
        });
    }

    Ok(Program::new(instructions)?)
}

/// Render a program as canonical source text.
pub fn disassemble(program: &Program) -> String {
    disassembler::disassemble(program)
}
