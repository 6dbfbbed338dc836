//! VM state management: frames, labels, call and value stacks, operand
//! resolution.

use crate::contract::check_signature;
use crate::error::RuntimeError;
use crate::frames::{FrameError, FrameStore};
use crate::io::{InputReader, OutputWriter};
use crate::labels::LabelTable;
use ippvm_common::{Instruction, Operand, Program, ProgramError, Value, VarRef};

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The instruction pointer ran past the last instruction.
    Completed,
    /// `EXIT` stopped the program with a code in 0..=9.
    Exit(u8),
}

impl ExitOutcome {
    /// Process exit code for this outcome.
    pub fn code(&self) -> i32 {
        match self {
            ExitOutcome::Completed => 0,
            ExitOutcome::Exit(code) => i32::from(*code),
        }
    }
}

/// The IPPcode24 virtual machine. One value per run.
pub struct VM<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    pub(crate) frames: FrameStore,
    pub(crate) labels: LabelTable,
    /// Return positions saved by CALL.
    pub(crate) call_stack: Vec<usize>,
    /// Values saved by PUSHS.
    pub(crate) value_stack: Vec<Value>,
    /// Index of the next instruction to fetch.
    pub(crate) pc: usize,
    /// Index of the instruction being executed.
    pub(crate) current: Option<usize>,
    /// Index of the instruction executed before `current`.
    pub(crate) last: Option<usize>,
    /// Non-LABEL instructions executed so far.
    pub(crate) executed: u64,
    pub(crate) input: &'a mut dyn InputReader,
    pub(crate) output: &'a mut dyn OutputWriter,
}

impl<'a> VM<'a> {
    /// Create a new VM for the given program.
    pub fn new(
        program: &'a Program,
        input: &'a mut dyn InputReader,
        output: &'a mut dyn OutputWriter,
    ) -> Self {
        Self {
            program,
            frames: FrameStore::new(),
            labels: LabelTable::default(),
            call_stack: Vec::new(),
            value_stack: Vec::new(),
            pc: 0,
            current: None,
            last: None,
            executed: 0,
            input,
            output,
        }
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn value_stack(&self) -> &[Value] {
        &self.value_stack
    }

    /// Non-LABEL instructions executed so far.
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Index of the instruction being executed, for error reports.
    pub(crate) fn at(&self) -> usize {
        self.current.unwrap_or_default()
    }

    /// Check the instruction's signature and validate every argument.
    ///
    /// All structural problems surface here, before any label, variable or
    /// value is looked at.
    pub(crate) fn operands(&self, instr: &'a Instruction) -> Result<Vec<Operand<'a>>, RuntimeError> {
        let at = self.at();
        check_signature(instr, at)?;
        instr
            .args
            .iter()
            .map(|arg| {
                arg.operand().map_err(|source| match source {
                    ProgramError::InvalidEscape(text) => RuntimeError::InvalidEscape { at, text },
                    source => RuntimeError::Malformed { at, source },
                })
            })
            .collect()
    }

    pub(crate) fn frame_error(&self, err: FrameError, var: VarRef<'_>) -> RuntimeError {
        let at = self.at();
        match err {
            FrameError::Missing(frame) => RuntimeError::FrameNotAvailable { at, frame },
            FrameError::Undeclared => RuntimeError::UndeclaredVariable {
                at,
                var: var.to_string(),
            },
            FrameError::Redeclared => RuntimeError::VariableRedeclared {
                at,
                var: var.to_string(),
            },
        }
    }

    fn internal(&self, message: &'static str) -> RuntimeError {
        RuntimeError::Internal {
            at: self.at(),
            message,
        }
    }

    /// The variable reference of a `Var`-shaped operand.
    pub(crate) fn var_ref(&self, operand: &Operand<'a>) -> Result<VarRef<'a>, RuntimeError> {
        match operand {
            Operand::Var(var) => Ok(*var),
            _ => Err(self.internal("expected a variable operand")),
        }
    }

    pub(crate) fn label_name(&self, operand: &Operand<'a>) -> Result<&'a str, RuntimeError> {
        match operand {
            Operand::Label(name) => Ok(*name),
            _ => Err(self.internal("expected a label operand")),
        }
    }

    /// Instruction index of a label.
    pub(crate) fn label_target(&self, operand: &Operand<'a>) -> Result<usize, RuntimeError> {
        let name = self.label_name(operand)?;
        self.labels
            .get(name)
            .ok_or_else(|| RuntimeError::UndefinedLabel {
                at: self.at(),
                label: name.to_string(),
            })
    }

    /// Fail unless the destination variable is declared in a reachable frame.
    pub(crate) fn check_destination(&self, var: VarRef<'_>) -> Result<(), RuntimeError> {
        self.frames
            .lookup(var)
            .map(|_| ())
            .map_err(|e| self.frame_error(e, var))
    }

    /// Current value of a declared variable; `None` if it was never assigned.
    pub(crate) fn variable(&self, var: VarRef<'_>) -> Result<Option<&Value>, RuntimeError> {
        self.frames
            .lookup(var)
            .map(|v| v.value.as_ref())
            .map_err(|e| self.frame_error(e, var))
    }

    /// Resolve a symbol to a copy of its value. Variables must be defined.
    pub(crate) fn value_of(&self, operand: &Operand<'a>) -> Result<Value, RuntimeError> {
        match operand {
            Operand::Literal(value) => Ok(value.clone()),
            Operand::Var(var) => self.variable(*var)?.cloned().ok_or_else(|| {
                RuntimeError::UninitializedVariable {
                    at: self.at(),
                    var: var.to_string(),
                }
            }),
            _ => Err(self.internal("expected a symbol operand")),
        }
    }

    pub(crate) fn assign(&mut self, var: VarRef<'_>, value: Value) -> Result<(), RuntimeError> {
        self.frames
            .assign(var, value)
            .map_err(|e| self.frame_error(e, var))
    }

    pub(crate) fn pop_value(&mut self) -> Result<Value, RuntimeError> {
        self.value_stack
            .pop()
            .ok_or(RuntimeError::EmptyValueStack { at: self.at() })
    }

    pub(crate) fn pop_call(&mut self) -> Result<usize, RuntimeError> {
        self.call_stack
            .pop()
            .ok_or(RuntimeError::EmptyCallStack { at: self.at() })
    }

    pub(crate) fn write_stdout(&mut self, text: &str) -> Result<(), RuntimeError> {
        let at = self.at();
        self.output
            .write_stdout(text)
            .map_err(|e| RuntimeError::Output {
                at,
                message: e.to_string(),
            })
    }

    pub(crate) fn write_stderr(&mut self, text: &str) -> Result<(), RuntimeError> {
        let at = self.at();
        self.output
            .write_stderr(text)
            .map_err(|e| RuntimeError::Output {
                at,
                message: e.to_string(),
            })
    }
}
