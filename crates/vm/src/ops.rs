//! Opcode handlers, one family per instruction category.
//!
//! Every handler validates its operands in the same order: argument shapes
//! and literal text, labels, variables, operand types, operand values. A
//! handler that fails leaves its destination untouched.

use crate::contract;
use crate::error::RuntimeError;
use crate::machine::VM;
use crate::render::render;
use ippvm_common::{FrameKind, Instruction, Operand, Value};
use std::fmt::Write as _;

impl<'a> VM<'a> {
    // ---- Data movement ----

    pub(crate) fn exec_move(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let dest = self.var_ref(&ops[0])?;
        self.check_destination(dest)?;
        let value = self.value_of(&ops[1])?;
        self.assign(dest, value)
    }

    /// TYPE accepts an undefined variable and yields the empty string.
    pub(crate) fn exec_type(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let dest = self.var_ref(&ops[0])?;
        self.check_destination(dest)?;
        let result = match &ops[1] {
            Operand::Var(var) => contract::type_name(self.variable(*var)?),
            other => contract::type_name(Some(&self.value_of(other)?)),
        };
        self.assign(dest, result)
    }

    // ---- Frames ----

    pub(crate) fn exec_create_frame(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        self.operands(instr)?;
        self.frames.create_frame();
        Ok(())
    }

    pub(crate) fn exec_push_frame(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        self.operands(instr)?;
        let at = self.at();
        self.frames
            .push_frame()
            .map_err(|_| RuntimeError::FrameNotAvailable {
                at,
                frame: FrameKind::Temporary,
            })
    }

    pub(crate) fn exec_pop_frame(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        self.operands(instr)?;
        let at = self.at();
        self.frames
            .pop_frame()
            .map_err(|_| RuntimeError::FrameNotAvailable {
                at,
                frame: FrameKind::Local,
            })
    }

    pub(crate) fn exec_defvar(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let var = self.var_ref(&ops[0])?;
        match self.frames.declare(var) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.frame_error(e, var)),
        }
    }

    // ---- Control flow ----

    pub(crate) fn exec_call(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let target = self.label_target(&ops[0])?;
        // pc already points past the CALL.
        self.call_stack.push(self.pc);
        tracing::trace!(target, depth = self.call_stack.len(), "call");
        self.pc = target;
        Ok(())
    }

    pub(crate) fn exec_return(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        self.operands(instr)?;
        self.pc = self.pop_call()?;
        tracing::trace!(resume = self.pc, depth = self.call_stack.len(), "return");
        Ok(())
    }

    pub(crate) fn exec_jump(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        self.pc = self.label_target(&ops[0])?;
        Ok(())
    }

    /// JUMPIFEQ (`when_equal`) and JUMPIFNEQ. The label must exist even
    /// when the branch is not taken.
    pub(crate) fn exec_jump_if(
        &mut self,
        instr: &'a Instruction,
        when_equal: bool,
    ) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let target = self.label_target(&ops[0])?;
        let a = self.value_of(&ops[1])?;
        let b = self.value_of(&ops[2])?;
        if contract::equals(instr.opcode, &a, &b, self.at())? == when_equal {
            self.pc = target;
        }
        Ok(())
    }

    pub(crate) fn exec_exit(&mut self, instr: &'a Instruction) -> Result<u8, RuntimeError> {
        let ops = self.operands(instr)?;
        let value = self.value_of(&ops[0])?;
        contract::exit_status(&value, self.at())
    }

    // ---- Value stack ----

    pub(crate) fn exec_pushs(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let value = self.value_of(&ops[0])?;
        self.value_stack.push(value);
        Ok(())
    }

    pub(crate) fn exec_pops(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let dest = self.var_ref(&ops[0])?;
        self.check_destination(dest)?;
        let value = self.pop_value()?;
        self.assign(dest, value)
    }

    // ---- Arithmetic, relational, boolean, conversion, strings ----

    /// Every `dest = op(symb...)` instruction whose result depends only on
    /// the symbol values.
    pub(crate) fn exec_compute(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let dest = self.var_ref(&ops[0])?;
        self.check_destination(dest)?;
        let values = ops[1..]
            .iter()
            .map(|op| self.value_of(op))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&Value> = values.iter().collect();
        let result = contract::apply(instr.opcode, &refs, self.at())?;
        self.assign(dest, result)
    }

    /// SETCHAR reads its destination, which must hold a string.
    pub(crate) fn exec_setchar(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let dest = self.var_ref(&ops[0])?;
        let current = self.value_of(&ops[0])?;
        let index = self.value_of(&ops[1])?;
        let source = self.value_of(&ops[2])?;
        let result = contract::apply(instr.opcode, &[&current, &index, &source], self.at())?;
        self.assign(dest, result)
    }

    // ---- I/O ----

    /// READ never fails on bad input: the variable becomes nil instead.
    pub(crate) fn exec_read(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let ty = match &ops[1] {
            Operand::Type(ty) => contract::readable(*ty, self.at())?,
            _ => {
                return Err(RuntimeError::Internal {
                    at: self.at(),
                    message: "READ operand is not a type",
                })
            }
        };
        let dest = self.var_ref(&ops[0])?;
        self.check_destination(dest)?;
        let value = self.input.read(ty).unwrap_or(Value::Nil);
        self.assign(dest, value)
    }

    pub(crate) fn exec_write(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let value = self.value_of(&ops[0])?;
        let text = render(&value);
        self.write_stdout(&text)
    }

    // ---- Debugging ----

    pub(crate) fn exec_dprint(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        let ops = self.operands(instr)?;
        let value = self.value_of(&ops[0])?;
        let text = render(&value);
        self.write_stderr(&text)
    }

    /// Dump interpreter state to the diagnostic stream. State is not changed.
    pub(crate) fn exec_break(&mut self, instr: &'a Instruction) -> Result<(), RuntimeError> {
        self.operands(instr)?;
        let report = self.break_report(instr);
        self.write_stderr(&report)
    }

    fn break_report(&self, instr: &Instruction) -> String {
        let describe = |index: Option<usize>, none: &str| {
            match index.and_then(|i| self.program.get(i).map(|instr| (i, instr))) {
                Some((i, instr)) => format!("[{i}] order {}: {instr}", instr.order),
                None => none.to_string(),
            }
        };

        let mut report = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            report,
            "BREAK at [{}] order {}",
            self.at(),
            instr.order
        );
        let _ = writeln!(report, "executed: {}", self.executed);
        let _ = writeln!(report, "last: {}", describe(self.last, "<none>"));
        let _ = writeln!(report, "next: {}", describe(Some(self.pc), "<end>"));
        let _ = writeln!(
            report,
            "call stack: {:?}, value stack depth: {}",
            self.call_stack,
            self.value_stack.len()
        );
        let _ = write!(report, "{}", self.frames);
        report
    }
}
