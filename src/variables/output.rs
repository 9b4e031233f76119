//! Output-variable extraction from JSON response bodies.
//!
//! A resource may bind an output variable to a stored JSON path. After
//! the resource executes, the response body is parsed and the path walked
//! to pull out the bound value for reuse in later steps.

use super::VarError;
use crate::models::PathSegment;
use serde_json::Value as JsonValue;

/// Parses `body` as JSON and walks `path` to extract a value, returned in
/// its string form.
pub fn extract_output_value(body: &str, path: &[PathSegment]) -> Result<String, VarError> {
    let json: JsonValue =
        serde_json::from_str(body).map_err(|e| VarError::Parse(e.to_string()))?;

    let mut current = &json;
    for segment in path {
        current = match segment {
            PathSegment::Key(key) => current.get(key).ok_or_else(|| {
                VarError::PathNotFound(format!("field '{}' not found", key))
            })?,
            PathSegment::Index(index) => current.get(index).ok_or_else(|| {
                VarError::PathNotFound(format!("index {} out of bounds", index))
            })?,
        };
    }

    Ok(json_value_to_string(current))
}

/// Converts a JSON value to the string stored in the variable store.
///
/// Strings are returned without quotes; numbers, booleans and null use
/// their literal form; objects and arrays are re-serialized.
pub fn json_value_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => "null".to_string(),
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}
