//! Declaration table: per-translation symbol state.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{SharedStructInterner, TypeError, TypeInfo};

/// Helper return types, the current function's variables, and the struct
/// names this translation has produced.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    structs: SharedStructInterner,
    /// Struct names interned through this table.
    used_structs: FxHashSet<String>,
    functions: Vec<(String, TypeInfo)>,
    vars: FxHashMap<String, TypeInfo>,
}

impl DeclarationTable {
    /// Table with a private struct interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table interning into `structs`, which may be shared with other translations.
    pub fn with_interner(structs: SharedStructInterner) -> Self {
        DeclarationTable {
            structs,
            ..Self::default()
        }
    }

    /// Register a helper function's return type.
    pub fn add_function(&mut self, name: impl Into<String>, return_type: TypeInfo) {
        self.functions.push((name.into(), return_type));
    }

    /// Return type of a helper; the latest registration wins.
    pub fn lookup_function(&self, name: &str) -> Option<&TypeInfo> {
        self.functions
            .iter()
            .rev()
            .find(|(f, _)| f == name)
            .map(|(_, ty)| ty)
    }

    /// Struct name for a `(field type text, field name)` signature.
    pub fn get_object(&mut self, signature: Vec<(String, String)>) -> String {
        let name = self.structs.intern(signature);
        self.used_structs.insert(name.clone());
        name
    }

    pub fn declare_variable(&mut self, name: impl Into<String>, ty: TypeInfo) {
        self.vars.insert(name.into(), ty);
    }

    pub fn var_type(&self, name: &str) -> Result<&TypeInfo, TypeError> {
        self.vars
            .get(name)
            .ok_or_else(|| TypeError::UndeclaredVariable(name.to_owned()))
    }

    /// Drop all variable bindings. Helper registrations and structs survive.
    pub fn reset_scope(&mut self) {
        self.vars.clear();
    }

    /// `typedef` block for every struct this table interned, in interning order.
    pub fn classes_definition(&self) -> String {
        self.structs
            .definitions(|name| self.used_structs.contains(name))
    }
}
