//! Global variable environment for the Gander engine.

use gander_types::Value;
use std::collections::BTreeMap;

/// Flat, global-only variable bindings.
///
/// There is no nesting and no shadowing: storing a name that already exists
/// replaces its value.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, returning the value it replaced.
    pub fn define(&mut self, name: &str, value: Value) -> Option<Value> {
        self.bindings.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bindings, ordered by name.
    pub fn bindings(&self) -> &BTreeMap<String, Value> {
        &self.bindings
    }
}
