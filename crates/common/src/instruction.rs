//! A single IPPcode24 instruction.

use crate::argument::Argument;
use crate::opcode::Opcode;

/// One instruction: an ordering key, an opcode and its positional arguments.
///
/// Instructions are immutable once built into a [`crate::Program`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Ordering key. Positive and unique within a program.
    pub order: i64,
    /// The operation to perform.
    pub opcode: Opcode,
    /// Arguments sorted by position.
    pub args: Vec<Argument>,
}

impl Instruction {
    /// Create a new instruction. Arguments are sorted by position.
    pub fn new(order: i64, opcode: Opcode, mut args: Vec<Argument>) -> Self {
        args.sort_by_key(|a| a.position);
        Self {
            order,
            opcode,
            args,
        }
    }

    /// The argument at `position`, if present.
    pub fn arg(&self, position: usize) -> Option<&Argument> {
        self.args.get(position).filter(|a| a.position == position)
    }
}

/// Canonical source line, e.g. `ADD GF@x GF@x int@3`.
impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.opcode.mnemonic())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
