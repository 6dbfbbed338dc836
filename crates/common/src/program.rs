//! Program representation: the executable instruction sequence.
//!
//! Instructions arrive in any order and are sorted by their `order` key.
//! The resulting sequence is gap-free and indexed from 0; labels and the
//! call stack refer to these indices, never to `order` values.

use crate::error::ProgramError;
use crate::instruction::Instruction;

/// An IPPcode24 program: instructions sorted by strictly increasing order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Sort and validate an instruction list.
    ///
    /// Rejects non-positive orders, duplicate orders, and instructions whose
    /// argument positions are not exactly `0..n`.
    pub fn new(mut instructions: Vec<Instruction>) -> Result<Self, ProgramError> {
        for instr in &instructions {
            if instr.order <= 0 {
                return Err(ProgramError::InvalidOrder { order: instr.order });
            }
            for (expected, arg) in instr.args.iter().enumerate() {
                if arg.position != expected {
                    return Err(ProgramError::ArgumentGap {
                        order: instr.order,
                        position: expected,
                    });
                }
            }
        }

        instructions.sort_by_key(|i| i.order);
        if let Some(pair) = instructions.windows(2).find(|w| w[0].order == w[1].order) {
            return Err(ProgramError::DuplicateOrder {
                order: pair[0].order,
            });
        }

        Ok(Self { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The instruction at a sequence index.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
