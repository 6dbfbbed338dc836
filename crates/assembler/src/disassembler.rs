//! Disassembler: program → canonical IPPcode24 text.
//!
//! Output is the header line followed by one instruction per line. No
//! indentation, no comments, no blank lines.

use ippvm_common::Program;

/// Render a program as canonical source text.
///
/// Instructions appear in execution order. For programs whose orders are
/// `1..=n` the output reassembles to an identical program.
pub fn disassemble(program: &Program) -> String {
    let mut out = String::from(".IPPcode24\n");
    for instr in program.instructions() {
        out.push_str(&instr.to_string());
        out.push('\n');
    }
    out
}
