//! HTTP response data model.
//!
//! Responses carry the status line, headers and body text produced by a
//! resource execution; the executor feeds the body to output-variable
//! extraction and the import collaborator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// An HTTP response received from a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404, 500).
    pub status_code: u16,

    /// Human-readable status text (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response headers as key-value pairs.
    pub headers: HashMap<String, String>,

    /// Response body text. Payloads in this domain (PDB/CIF/SDF/JSON) are
    /// textual, so the body is kept as a `String`.
    pub body: String,

    /// Total request duration.
    pub duration: Duration,
}

impl HttpResponse {
    /// Creates a response with the given status line and no headers/body.
    pub fn new(status_code: u16, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            headers: HashMap::new(),
            body: String::new(),
            duration: Duration::from_secs(0),
        }
    }

    /// Whether the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Gets the Content-Type header value if present, case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Adds a header to the response.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }
}
