//! Struct shape interning.
//!
//! A struct is identified by its body text: `{T a;\nU b;}` with fields sorted
//! by name. Equal bodies map to one `GenClass<N>` name.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

#[derive(Default, Debug)]
struct StructTable {
    /// Body text to struct name.
    by_body: FxHashMap<String, String>,
    /// `(body, name)` in first-seen order.
    entries: Vec<(String, String)>,
}

impl StructTable {
    fn intern(&mut self, signature: &mut [(String, String)]) -> (String, bool) {
        signature.sort_by(|a, b| a.1.cmp(&b.1));
        let fields: Vec<String> = signature
            .iter()
            .map(|(ty, field)| format!("{ty} {field};"))
            .collect();
        let body = format!("{{{}}}", fields.join("\n"));

        if let Some(name) = self.by_body.get(&body) {
            return (name.clone(), false);
        }
        let name = format!("GenClass{}", self.entries.len());
        self.by_body.insert(body.clone(), name.clone());
        self.entries.push((body, name.clone()));
        (name, true)
    }
}

/// Mutex-guarded struct table that can be shared between translations.
///
/// Cloning yields another handle to the same table. A fresh handle per
/// translation keeps struct names translation-local.
#[derive(Clone, Default, Debug)]
pub struct SharedStructInterner(Arc<Mutex<StructTable>>);

impl SharedStructInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a `(field type text, field name)` signature in any order.
    pub fn intern(&self, mut signature: Vec<(String, String)>) -> String {
        let (name, fresh) = self.0.lock().intern(&mut signature);
        if fresh {
            tracing::debug!(%name, fields = signature.len(), "interned struct");
        }
        name
    }

    /// `typedef` text for every struct accepted by `include`, in first-seen order.
    pub fn definitions(&self, include: impl Fn(&str) -> bool) -> String {
        let table = self.0.lock();
        table
            .entries
            .iter()
            .filter(|(_, name)| include(name))
            .map(|(body, name)| format!("typedef struct {body} {name};"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Number of distinct structs interned so far.
    pub fn count(&self) -> usize {
        self.0.lock().entries.len()
    }
}

#[cfg(test)]
mod tests;
