//! Variable storage, `{{name}}` template substitution, and output-variable
//! extraction from JSON response bodies.

pub mod output;
pub mod store;
pub mod substitution;

pub use output::{extract_output_value, json_value_to_string};
pub use store::VariableStore;
pub use substitution::{extract_variables, scan_variables, substitute, SubstitutionContext};

use std::fmt;

/// Errors raised by variable operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarError {
    /// The named variable does not exist in the store.
    NotFound(String),

    /// A response body expected to be JSON could not be parsed.
    Parse(String),

    /// A stored JSON path did not resolve against the parsed response.
    PathNotFound(String),
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarError::NotFound(name) => write!(f, "variable '{}' not found", name),
            VarError::Parse(msg) => write!(f, "response is not valid JSON: {}", msg),
            VarError::PathNotFound(msg) => write!(f, "path not found in response: {}", msg),
        }
    }
}

impl std::error::Error for VarError {}
