//! Global variable store.
//!
//! Maps variable name to current string value. Entries are lazily created
//! on first reference ("touched"), so reads have an initialization side
//! effect: after any template mentions `{{name}}`, the store holds an
//! entry for `name`.

use super::VarError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping of variable name to current string value.
///
/// Values are plain strings; numeric or boolean interpretation is the
/// caller's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableStore {
    variables: HashMap<String, String>,
}

impl VariableStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures `name` exists, creating it with an empty value if absent.
    pub fn touch(&mut self, name: &str) {
        if !self.variables.contains_key(name) {
            self.variables.insert(name.to_string(), String::new());
        }
    }

    /// Returns the value of `name`, touching it into existence first.
    pub fn get(&mut self, name: &str) -> String {
        self.touch(name);
        self.variables.get(name).cloned().unwrap_or_default()
    }

    /// Looks up `name` without the touch side effect.
    pub fn peek(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Sets `name` to `value`, overwriting any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Removes `name` from the store.
    pub fn delete(&mut self, name: &str) -> Result<(), VarError> {
        self.variables
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| VarError::NotFound(name.to_string()))
    }

    /// Whether the store contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of variables in the store.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The underlying map, for use as a substitution context layer.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.variables
    }
}

impl From<HashMap<String, String>> for VariableStore {
    fn from(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }
}
