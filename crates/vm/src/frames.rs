//! Frame store: the global frame, the local frame stack and the optional
//! temporary frame.
//!
//! Lookups through `LF` and `TF` fall back to the global frame when the
//! name is not found in the addressed frame(s). Programs in the wild depend
//! on this, so it is kept.

use ippvm_common::{FrameKind, Value, VarRef};
use std::collections::BTreeMap;

/// A declared variable. `value` is `None` until the first assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variable {
    pub value: Option<Value>,
}

impl Variable {
    pub fn is_defined(&self) -> bool {
        self.value.is_some()
    }
}

/// Variables of one frame, keyed by name. Ordered so dumps are stable.
pub type Frame = BTreeMap<String, Variable>;

/// Why a frame operation failed. The engine attaches the instruction index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The addressed local or temporary frame does not exist.
    Missing(FrameKind),
    /// No variable of that name is visible.
    Undeclared,
    /// The name is already declared in the target frame.
    Redeclared,
}

/// All variable storage for one run.
#[derive(Debug, Clone, Default)]
pub struct FrameStore {
    global: Frame,
    locals: Vec<Frame>,
    temporary: Option<Frame>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any temporary frame with a fresh empty one.
    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::new());
    }

    /// Move the temporary frame onto the local stack.
    pub fn push_frame(&mut self) -> Result<(), FrameError> {
        let frame = self
            .temporary
            .take()
            .ok_or(FrameError::Missing(FrameKind::Temporary))?;
        self.locals.push(frame);
        Ok(())
    }

    /// Move the top local frame into the temporary slot.
    pub fn pop_frame(&mut self) -> Result<(), FrameError> {
        let frame = self
            .locals
            .pop()
            .ok_or(FrameError::Missing(FrameKind::Local))?;
        self.temporary = Some(frame);
        Ok(())
    }

    /// Declare an undefined variable in the addressed frame.
    pub fn declare(&mut self, var: VarRef<'_>) -> Result<(), FrameError> {
        let frame = match var.frame {
            FrameKind::Global => &mut self.global,
            FrameKind::Local => self
                .locals
                .last_mut()
                .ok_or(FrameError::Missing(FrameKind::Local))?,
            FrameKind::Temporary => self
                .temporary
                .as_mut()
                .ok_or(FrameError::Missing(FrameKind::Temporary))?,
        };
        if frame.contains_key(var.name) {
            return Err(FrameError::Redeclared);
        }
        frame.insert(var.name.to_string(), Variable::default());
        Ok(())
    }

    pub fn lookup(&self, var: VarRef<'_>) -> Result<&Variable, FrameError> {
        let found = match var.frame {
            FrameKind::Global => self.global.get(var.name),
            FrameKind::Local => {
                if self.locals.is_empty() {
                    return Err(FrameError::Missing(FrameKind::Local));
                }
                self.locals
                    .iter()
                    .rev()
                    .find_map(|frame| frame.get(var.name))
                    .or_else(|| self.global.get(var.name))
            }
            FrameKind::Temporary => self
                .temporary
                .as_ref()
                .ok_or(FrameError::Missing(FrameKind::Temporary))?
                .get(var.name)
                .or_else(|| self.global.get(var.name)),
        };
        found.ok_or(FrameError::Undeclared)
    }

    pub fn lookup_mut(&mut self, var: VarRef<'_>) -> Result<&mut Variable, FrameError> {
        let found = match var.frame {
            FrameKind::Global => self.global.get_mut(var.name),
            FrameKind::Local => {
                if self.locals.is_empty() {
                    return Err(FrameError::Missing(FrameKind::Local));
                }
                match self
                    .locals
                    .iter()
                    .rposition(|frame| frame.contains_key(var.name))
                {
                    Some(depth) => self.locals[depth].get_mut(var.name),
                    None => self.global.get_mut(var.name),
                }
            }
            FrameKind::Temporary => {
                let temporary = self
                    .temporary
                    .as_mut()
                    .ok_or(FrameError::Missing(FrameKind::Temporary))?;
                if temporary.contains_key(var.name) {
                    temporary.get_mut(var.name)
                } else {
                    self.global.get_mut(var.name)
                }
            }
        };
        found.ok_or(FrameError::Undeclared)
    }

    /// Assign a value to a declared variable.
    pub fn assign(&mut self, var: VarRef<'_>, value: Value) -> Result<(), FrameError> {
        self.lookup_mut(var)?.value = Some(value);
        Ok(())
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    /// Local frames, bottom first.
    pub fn locals(&self) -> &[Frame] {
        &self.locals
    }

    pub fn temporary(&self) -> Option<&Frame> {
        self.temporary.as_ref()
    }
}

fn write_frame(f: &mut std::fmt::Formatter<'_>, label: &str, frame: &Frame) -> std::fmt::Result {
    write!(f, "{label}:")?;
    for (name, var) in frame {
        match &var.value {
            Some(value) => write!(f, " {name}={value}")?,
            None => write!(f, " {name}=<undefined>")?,
        }
    }
    writeln!(f)
}

/// Multi-line dump used by `BREAK`.
impl std::fmt::Display for FrameStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_frame(f, "GF", &self.global)?;
        if self.locals.is_empty() {
            writeln!(f, "LF: <none>")?;
        }
        for (depth, frame) in self.locals.iter().enumerate().rev() {
            write_frame(f, &format!("LF[{depth}]"), frame)?;
        }
        match &self.temporary {
            Some(frame) => write_frame(f, "TF", frame),
            None => writeln!(f, "TF: <none>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(frame: FrameKind, name: &str) -> VarRef<'_> {
        VarRef { frame, name }
    }

    #[test]
    fn global_declare_and_assign() {
        let mut store = FrameStore::new();
        store.declare(var(FrameKind::Global, "x")).unwrap();
        assert!(!store.lookup(var(FrameKind::Global, "x")).unwrap().is_defined());
        store
            .assign(var(FrameKind::Global, "x"), Value::Int(5))
            .unwrap();
        assert_eq!(
            store.lookup(var(FrameKind::Global, "x")).unwrap().value,
            Some(Value::Int(5))
        );
    }

    #[test]
    fn redeclaration_in_same_frame() {
        let mut store = FrameStore::new();
        store.declare(var(FrameKind::Global, "x")).unwrap();
        assert_eq!(
            store.declare(var(FrameKind::Global, "x")),
            Err(FrameError::Redeclared)
        );
    }

    #[test]
    fn missing_frames() {
        let mut store = FrameStore::new();
        assert_eq!(
            store.declare(var(FrameKind::Local, "x")),
            Err(FrameError::Missing(FrameKind::Local))
        );
        assert_eq!(
            store.declare(var(FrameKind::Temporary, "x")),
            Err(FrameError::Missing(FrameKind::Temporary))
        );
        assert_eq!(store.push_frame(), Err(FrameError::Missing(FrameKind::Temporary)));
        assert_eq!(store.pop_frame(), Err(FrameError::Missing(FrameKind::Local)));
        assert_eq!(
            store.lookup(var(FrameKind::Local, "x")).err(),
            Some(FrameError::Missing(FrameKind::Local))
        );
    }

    #[test]
    fn push_then_pop_restores_temporary() {
        let mut store = FrameStore::new();
        store.create_frame();
        store.declare(var(FrameKind::Temporary, "a")).unwrap();
        store
            .assign(var(FrameKind::Temporary, "a"), Value::Bool(true))
            .unwrap();
        let before = store.temporary().cloned();

        store.push_frame().unwrap();
        assert!(store.temporary().is_none());
        assert_eq!(store.locals().len(), 1);

        store.pop_frame().unwrap();
        assert_eq!(store.temporary().cloned(), before);
        assert!(store.locals().is_empty());
    }

    #[test]
    fn create_frame_discards_previous() {
        let mut store = FrameStore::new();
        store.create_frame();
        store.declare(var(FrameKind::Temporary, "a")).unwrap();
        store.create_frame();
        assert_eq!(store.temporary().map(|f| f.len()), Some(0));
    }

    #[test]
    fn local_lookup_walks_stack_then_global() {
        let mut store = FrameStore::new();
        store.declare(var(FrameKind::Global, "g")).unwrap();
        store.create_frame();
        store.declare(var(FrameKind::Temporary, "outer")).unwrap();
        store.push_frame().unwrap();
        store.create_frame();
        store.push_frame().unwrap();

        assert!(store.lookup(var(FrameKind::Local, "outer")).is_ok());
        assert!(store.lookup(var(FrameKind::Local, "g")).is_ok());
        assert_eq!(
            store.lookup(var(FrameKind::Local, "nope")).err(),
            Some(FrameError::Undeclared)
        );

        store
            .assign(var(FrameKind::Local, "g"), Value::Int(1))
            .unwrap();
        assert_eq!(
            store.lookup(var(FrameKind::Global, "g")).unwrap().value,
            Some(Value::Int(1))
        );
    }

    #[test]
    fn temporary_lookup_falls_back_to_global() {
        let mut store = FrameStore::new();
        store.declare(var(FrameKind::Global, "g")).unwrap();
        store.create_frame();
        store
            .assign(var(FrameKind::Temporary, "g"), Value::Nil)
            .unwrap();
        assert_eq!(
            store.lookup(var(FrameKind::Global, "g")).unwrap().value,
            Some(Value::Nil)
        );
    }

    #[test]
    fn global_lookup_never_sees_locals() {
        let mut store = FrameStore::new();
        store.create_frame();
        store.declare(var(FrameKind::Temporary, "t")).unwrap();
        assert_eq!(
            store.lookup(var(FrameKind::Global, "t")).err(),
            Some(FrameError::Undeclared)
        );
    }

    #[test]
    fn dump_lists_every_frame() {
        let mut store = FrameStore::new();
        store.declare(var(FrameKind::Global, "b")).unwrap();
        store.declare(var(FrameKind::Global, "a")).unwrap();
        store
            .assign(var(FrameKind::Global, "a"), Value::Int(3))
            .unwrap();
        assert_eq!(
            store.to_string(),
            "GF: a=int@3 b=<undefined>\nLF: <none>\nTF: <none>\n"
        );
    }
}
