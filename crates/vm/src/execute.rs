//! Main execution loop and opcode dispatch for the IPPcode24 VM.

use crate::error::RuntimeError;
use crate::labels::LabelTable;
use crate::machine::{ExitOutcome, VM};
use ippvm_common::Opcode;

impl<'a> VM<'a> {
    /// Execute the program until it runs off the end, hits EXIT, or fails.
    ///
    /// Labels are collected first; no other instruction runs during that
    /// pass. Execution then starts at index 0.
    #[tracing::instrument(level = "debug", skip_all, fields(instructions = self.program.len()))]
    pub fn execute(&mut self) -> Result<ExitOutcome, RuntimeError> {
        self.labels = LabelTable::collect(self.program)?;
        tracing::debug!(labels = self.labels.len(), "label collection complete");

        let program = self.program;
        while let Some(instr) = program.get(self.pc) {
            self.last = self.current.replace(self.pc);
            self.pc += 1;
            if instr.opcode != Opcode::Label {
                self.executed += 1;
            }
            tracing::trace!(index = self.at(), order = instr.order, %instr, "dispatch");

            match instr.opcode {
                // Data movement
                Opcode::Move => self.exec_move(instr)?,
                Opcode::Type => self.exec_type(instr)?,

                // Frames
                Opcode::CreateFrame => self.exec_create_frame(instr)?,
                Opcode::PushFrame => self.exec_push_frame(instr)?,
                Opcode::PopFrame => self.exec_pop_frame(instr)?,
                Opcode::Defvar => self.exec_defvar(instr)?,

                // Control flow
                Opcode::Call => self.exec_call(instr)?,
                Opcode::Return => self.exec_return(instr)?,
                Opcode::Label => {} // Collected before execution.
                Opcode::Jump => self.exec_jump(instr)?,
                Opcode::JumpIfEq => self.exec_jump_if(instr, true)?,
                Opcode::JumpIfNeq => self.exec_jump_if(instr, false)?,
                Opcode::Exit => {
                    let code = self.exec_exit(instr)?;
                    tracing::debug!(code, executed = self.executed, "program exited");
                    return Ok(ExitOutcome::Exit(code));
                }

                // Value stack
                Opcode::Pushs => self.exec_pushs(instr)?,
                Opcode::Pops => self.exec_pops(instr)?,

                // Arithmetic, relational, boolean, conversion, strings
                Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Idiv
                | Opcode::Lt
                | Opcode::Gt
                | Opcode::Eq
                | Opcode::And
                | Opcode::Or
                | Opcode::Not
                | Opcode::Int2Char
                | Opcode::Stri2Int
                | Opcode::Concat
                | Opcode::Strlen
                | Opcode::Getchar => self.exec_compute(instr)?,
                Opcode::Setchar => self.exec_setchar(instr)?,

                // I/O
                Opcode::Read => self.exec_read(instr)?,
                Opcode::Write => self.exec_write(instr)?,

                // Debugging
                Opcode::Dprint => self.exec_dprint(instr)?,
                Opcode::Break => self.exec_break(instr)?,
            }
        }

        tracing::debug!(executed = self.executed, "program completed");
        Ok(ExitOutcome::Completed)
    }
}
