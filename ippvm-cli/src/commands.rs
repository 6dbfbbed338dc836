//! CLI command implementations.

use ippvm_common::Program;
use ippvm_vm::io::{InputReader, LineInput, StdOutput};
use ippvm_vm::{ExitOutcome, LabelTable};
use std::fs::{self, File};
use std::io::{self, BufReader};

pub const USAGE_EXIT_CODE: i32 = 10;
pub const FILE_EXIT_CODE: i32 = 11;

/// Load and execute a program.
///
/// Stdin is the input stream unless `--input <file>` is given.
pub fn run(args: &[String]) -> Result<(), i32> {
    let (source, input_path) = match args {
        [source] => (source, None),
        [source, flag, path] if flag == "--input" => (source, Some(path)),
        _ => {
            eprintln!("error: run requires a source file");
            eprintln!("Usage: ippvm run <source> [--input <file>]");
            return Err(USAGE_EXIT_CODE);
        }
    };

    let program = load(source)?;

    match input_path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                eprintln!("error: cannot read '{path}': {e}");
                FILE_EXIT_CODE
            })?;
            execute(&program, &mut LineInput::new(BufReader::new(file)))
        }
        None => execute(&program, &mut LineInput::new(io::stdin().lock())),
    }
}

fn execute(program: &Program, input: &mut dyn InputReader) -> Result<(), i32> {
    let mut output = StdOutput::new();
    match ippvm_vm::run(program, input, &mut output) {
        Ok(ExitOutcome::Completed) => Ok(()),
        Ok(ExitOutcome::Exit(0)) => Ok(()),
        Ok(outcome) => Err(outcome.code()),
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(e.exit_code())
        }
    }
}

/// Load a program and collect its labels without executing it.
pub fn check(args: &[String]) -> Result<(), i32> {
    let [source] = args else {
        eprintln!("error: check requires a source file");
        eprintln!("Usage: ippvm check <source>");
        return Err(USAGE_EXIT_CODE);
    };

    let program = load(source)?;
    let labels = LabelTable::collect(&program).map_err(|e| {
        eprintln!("error: {e}");
        e.exit_code()
    })?;

    println!(
        "OK: {source} ({} instructions, {} labels)",
        program.len(),
        labels.len()
    );
    Ok(())
}

/// Print the canonical listing of a program.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    let [source] = args else {
        eprintln!("error: disassemble requires a source file");
        eprintln!("Usage: ippvm disassemble <source>");
        return Err(USAGE_EXIT_CODE);
    };

    let program = load(source)?;
    print!("{}", ippvm_assembler::disassemble(&program));
    Ok(())
}

/// Read and load a source file, reporting failures on stderr.
fn load(source: &str) -> Result<Program, i32> {
    let text = fs::read_to_string(source).map_err(|e| {
        eprintln!("error: cannot read '{source}': {e}");
        FILE_EXIT_CODE
    })?;

    let program = ippvm_assembler::assemble(&text).map_err(|e| {
        eprintln!("error: {source}: {e}");
        e.exit_code()
    })?;
    tracing::debug!(source, instructions = program.len(), "loaded");
    Ok(program)
}
