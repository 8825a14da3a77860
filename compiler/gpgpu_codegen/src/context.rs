//! Per-statement code generation state.
//!
//! An [`ExpressionContext`] lives for one statement. Expressions that need
//! an address for a value with no storage (an object literal passed to a
//! helper) hoist it into a temporary here; the statement parser renders the
//! temporaries as declarations ahead of the statement text.

use std::cell::Cell;

use gpgpu_types::{TypeError, TypeInfo};

/// Temporary name source, shared by every statement of one translation.
#[derive(Debug, Default)]
pub struct TempNames {
    next: Cell<u32>,
}

impl TempNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a unique temporary variable name.
    pub fn fresh(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("___builtin_temp_{n}")
    }
}

/// A hoisted temporary.
#[derive(Clone, PartialEq, Debug)]
struct Temp {
    name: String,
    ty: TypeInfo,
    value: Option<String>,
}

/// Temporaries accumulated while generating one statement.
#[derive(Debug)]
pub struct ExpressionContext<'t> {
    names: &'t TempNames,
    temps: Vec<Temp>,
}

impl<'t> ExpressionContext<'t> {
    pub fn new(names: &'t TempNames) -> Self {
        ExpressionContext {
            names,
            temps: Vec::new(),
        }
    }

    /// Declare a temporary of type `ty`, optionally initialized, and return its name.
    pub fn declare_temp(&mut self, ty: TypeInfo, value: Option<String>) -> String {
        let name = self.names.fresh();
        tracing::trace!(%name, "hoisted temporary");
        self.temps.push(Temp {
            name: name.clone(),
            ty,
            value,
        });
        name
    }

    /// Declarations for every temporary, one per line, each ending in `\n`.
    pub fn render(&self) -> Result<String, TypeError> {
        let mut out = String::new();
        for temp in &self.temps {
            let ty = temp.ty.c_type()?;
            match &temp.value {
                Some(value) => out.push_str(&format!("{ty} {} = {value};\n", temp.name)),
                None => out.push_str(&format!("{ty} {};\n", temp.name)),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests;
