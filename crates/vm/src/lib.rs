//! IPPcode24 virtual machine: executes ordered instruction lists.
//!
//! The machine has:
//! - a global frame, a stack of local frames and an optional temporary frame
//! - a label table built before execution starts
//! - a call stack of return positions and a value stack for PUSHS/POPS
//!
//! # Usage
//!
//! ```
//! use ippvm_common::{ArgKind, Argument, Instruction, Opcode, Program};
//! use ippvm_vm::io::{CollectOutput, NoInput};
//! use ippvm_vm::{run, ExitOutcome};
//!
//! let program = Program::new(vec![Instruction::new(
//!     1,
//!     Opcode::Write,
//!     vec![Argument::new(0, ArgKind::String, "hello\\032world")],
//! )])
//! .unwrap();
//!
//! let mut output = CollectOutput::new();
//! let outcome = run(&program, &mut NoInput, &mut output).unwrap();
//! assert_eq!(outcome, ExitOutcome::Completed);
//! assert_eq!(output.stdout, "hello world");
//! ```

pub mod contract;
pub mod error;
pub mod execute;
pub mod frames;
pub mod io;
pub mod labels;
pub mod machine;
pub mod ops;
pub mod render;

pub use error::{ErrorKind, RuntimeError};
pub use labels::LabelTable;
pub use machine::{ExitOutcome, VM};

use io::{InputReader, OutputWriter};
use ippvm_common::Program;

/// Execute a program to completion.
///
/// This is the primary entry point for the VM. It:
/// 1. Collects labels
/// 2. Executes from the first instruction until the end or `EXIT`
/// 3. Flushes the output collaborator
///
/// # Errors
///
/// Returns the first [`RuntimeError`]; [`RuntimeError::exit_code`] gives the
/// process exit code.
pub fn run(
    program: &Program,
    input: &mut dyn InputReader,
    output: &mut dyn OutputWriter,
) -> Result<ExitOutcome, RuntimeError> {
    let result = VM::new(program, input, &mut *output).execute();
    let flushed = output.flush();
    let outcome = result?;
    flushed.map_err(|e| RuntimeError::Output {
        at: program.len(),
        message: e.to_string(),
    })?;
    Ok(outcome)
}
