//! Label table, built before execution starts.

use crate::contract::check_signature;
use crate::error::RuntimeError;
use ippvm_common::{Opcode, Operand, Program};
use std::collections::HashMap;

/// Label name to instruction index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: HashMap<String, usize>,
}

impl LabelTable {
    /// Collect every `LABEL` in the program. Nothing else is executed.
    ///
    /// Defining a name twice at different indices is a semantic error.
    /// Re-inserting the same name at the same index is accepted, so running
    /// the collection again over a table is harmless.
    pub fn collect(program: &Program) -> Result<Self, RuntimeError> {
        let mut table = Self::default();
        for (index, instr) in program.instructions().iter().enumerate() {
            if instr.opcode != Opcode::Label {
                continue;
            }
            check_signature(instr, index)?;
            let name = match instr.args[0].operand() {
                Ok(Operand::Label(name)) => name,
                Ok(_) => {
                    return Err(RuntimeError::Internal {
                        at: index,
                        message: "LABEL operand is not a label",
                    })
                }
                Err(source) => return Err(RuntimeError::Malformed { at: index, source }),
            };
            table.define(name, index)?;
        }
        Ok(table)
    }

    /// Record `name` at `index`.
    pub fn define(&mut self, name: &str, index: usize) -> Result<(), RuntimeError> {
        match self.labels.get(name) {
            Some(&first) if first != index => Err(RuntimeError::LabelRedefined {
                at: index,
                label: name.to_string(),
                first,
            }),
            Some(_) => Ok(()),
            None => {
                self.labels.insert(name.to_string(), index);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
