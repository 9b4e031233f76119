//! Template substitution engine.
//!
//! Templates reference variables with `{{name}}` placeholders. Extraction
//! finds the distinct names a template mentions; substitution resolves
//! each placeholder against a layered context of name→value maps, with
//! earlier layers shadowing later ones.

use super::VariableStore;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Cached pattern for `{{name}}` placeholders. The identifier is one or
/// more characters excluding `}`, so `{{}}` never matches and an
/// unterminated `{{` is left untouched.
static VARIABLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("variable pattern is valid"));

/// Returns the distinct variable names referenced by `template`, in order
/// of first occurrence.
pub fn scan_variables(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for cap in VARIABLE_REGEX.captures_iter(template) {
        let name = &cap[1];
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }
    names
}

/// Scans `template` and touches every referenced name into `store`, so
/// the store always holds an entry for every variable any template ever
/// mentioned. Returns the names in first-seen order.
pub fn extract_variables(template: &str, store: &mut VariableStore) -> Vec<String> {
    let names = scan_variables(template);
    for name in &names {
        store.touch(name);
    }
    names
}

/// Ordered sequence of name→value layers for substitution.
///
/// Lookups short-circuit at the first layer containing the key, so a
/// per-field entry can shadow a global variable of the same name, and a
/// prior step's result can be referenced by its synthetic key.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionContext<'a> {
    layers: Vec<&'a HashMap<String, String>>,
}

impl<'a> SubstitutionContext<'a> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Appends a layer; earlier layers win on conflicts.
    pub fn with_layer(mut self, layer: &'a HashMap<String, String>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Resolves `name` through the layers; `None` if no layer has it.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.layers
            .iter()
            .find_map(|layer| layer.get(name))
            .map(String::as_str)
    }
}

/// Replaces every `{{name}}` occurrence in `template` with the value of
/// `name` resolved through `context`, or the empty string if no layer has
/// it. Substitution is textual and non-recursive: a substituted value is
/// never re-scanned for further placeholders.
pub fn substitute(template: &str, context: &SubstitutionContext<'_>) -> String {
    // Fast path for templates with no placeholders at all.
    if !template.contains("{{") {
        return template.to_string();
    }

    let mut result = String::with_capacity(template.len());
    let mut last_match_end = 0;

    for cap in VARIABLE_REGEX.captures_iter(template) {
        let full_match = cap.get(0).expect("capture 0 always present");
        let name = &cap[1];

        result.push_str(&template[last_match_end..full_match.start()]);
        result.push_str(context.resolve(name).unwrap_or(""));
        last_match_end = full_match.end();
    }

    result.push_str(&template[last_match_end..]);
    result
}
