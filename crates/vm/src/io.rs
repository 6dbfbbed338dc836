//! Input and output collaborators for the engine.
//!
//! `READ` pulls from an [`InputReader`]; `WRITE`, `DPRINT` and `BREAK` push
//! rendered text to an [`OutputWriter`]. The engine never touches process
//! streams directly, so tests can capture everything with [`CollectOutput`].

use ippvm_common::literal::{parse_float, parse_int};
use ippvm_common::{Value, ValueType};
use std::io::{BufRead, BufWriter, Cursor, Stdout, Write};

/// Source of values for `READ`.
pub trait InputReader {
    /// Read one value of the requested type.
    ///
    /// Returns `None` at end of input or when the line does not parse as
    /// `ty`. Otherwise the value has exactly the requested type.
    fn read(&mut self, ty: ValueType) -> Option<Value>;
}

/// Reads one line per request.
///
/// - `int`: decimal, `0x` hexadecimal or `0o` octal, surrounding whitespace ignored
/// - `float`: decimal or hexadecimal notation
/// - `bool`: `true` in any case is true, anything else is false
/// - `string`: the line as is, without its line terminator
#[derive(Debug)]
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
        }
    }
}

impl LineInput<Cursor<Vec<u8>>> {
    /// Input backed by an in-memory string.
    pub fn from_text(text: &str) -> Self {
        Self::new(Cursor::new(text.as_bytes().to_vec()))
    }
}

impl<R: BufRead> InputReader for LineInput<R> {
    fn read(&mut self, ty: ValueType) -> Option<Value> {
        if !ty.is_readable() {
            return None;
        }
        let line = self.next_line()?;
        match ty {
            ValueType::Int => parse_int(line.trim()).map(Value::Int),
            ValueType::Float => parse_float(line.trim()).map(Value::Float),
            ValueType::Bool => Some(Value::Bool(line.trim().eq_ignore_ascii_case("true"))),
            ValueType::String => Some(Value::Str(line)),
            ValueType::Nil => None,
        }
    }
}

/// Sink for program output.
pub trait OutputWriter {
    /// Text for the program's standard output (`WRITE`).
    fn write_stdout(&mut self, text: &str) -> std::io::Result<()>;

    /// Text for the diagnostic stream (`DPRINT`, `BREAK`).
    fn write_stderr(&mut self, text: &str) -> std::io::Result<()>;

    /// Called once when the run ends.
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes to the process streams. Stdout is buffered until [`OutputWriter::flush`].
pub struct StdOutput {
    stdout: BufWriter<Stdout>,
}

impl StdOutput {
    pub fn new() -> Self {
        Self {
            stdout: BufWriter::new(std::io::stdout()),
        }
    }
}

impl Default for StdOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter for StdOutput {
    fn write_stdout(&mut self, text: &str) -> std::io::Result<()> {
        self.stdout.write_all(text.as_bytes())
    }

    fn write_stderr(&mut self, text: &str) -> std::io::Result<()> {
        // Keep ordering sensible when both streams go to a terminal.
        self.stdout.flush()?;
        let mut stderr = std::io::stderr().lock();
        stderr.write_all(text.as_bytes())?;
        stderr.flush()
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.stdout.flush()
    }
}

/// Captures both streams in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CollectOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputWriter for CollectOutput {
    fn write_stdout(&mut self, text: &str) -> std::io::Result<()> {
        self.stdout.push_str(text);
        Ok(())
    }

    fn write_stderr(&mut self, text: &str) -> std::io::Result<()> {
        self.stderr.push_str(text);
        Ok(())
    }
}

/// Input with nothing to read: every `READ` yields nil.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputReader for NoInput {
    fn read(&mut self, _ty: ValueType) -> Option<Value> {
        None
    }
}
