//! Execution error types.

use std::fmt;
use uuid::Uuid;

/// Errors that can occur while performing one HTTP call.
#[derive(Debug)]
pub enum RequestError {
    /// Connection failure, DNS error, or other network-level issue.
    NetworkError(String),

    /// The request exceeded the configured timeout.
    Timeout,

    /// The URL could not be parsed.
    InvalidUrl(String),

    /// Certificate validation or TLS handshake failure.
    TlsError(String),

    /// The HTTP client could not be constructed or the request built.
    BuildError(String),

    /// Only http and https URLs are executable.
    UnsupportedProtocol(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NetworkError(msg) => write!(f, "network error: {}", msg),
            RequestError::Timeout => write!(f, "request timed out"),
            RequestError::InvalidUrl(url) => write!(f, "invalid URL: {}", url),
            RequestError::TlsError(msg) => write!(f, "TLS error: {}", msg),
            RequestError::BuildError(msg) => write!(f, "request build error: {}", msg),
            RequestError::UnsupportedProtocol(scheme) => {
                write!(f, "unsupported protocol: {}", scheme)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RequestError::Timeout
        } else if err.is_builder() {
            RequestError::BuildError(err.to_string())
        } else if err.to_string().contains("certificate") || err.to_string().contains("TLS") {
            RequestError::TlsError(err.to_string())
        } else {
            RequestError::NetworkError(err.to_string())
        }
    }
}

impl From<url::ParseError> for RequestError {
    fn from(err: url::ParseError) -> Self {
        RequestError::InvalidUrl(err.to_string())
    }
}

/// Errors returned by the pipeline executor itself.
///
/// A step's transport failure does not raise out of a pipeline run; it is
/// reported through the notifier and recorded in the run report. These
/// errors cover the cases where a run (or probe) cannot proceed at all.
#[derive(Debug)]
pub enum PipelineError {
    /// No request with this id exists.
    UnknownRequest(Uuid),

    /// A step references a resource the registry no longer knows.
    UnknownResource(Uuid),

    /// A single-resource probe failed at the transport level.
    Transport(RequestError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::UnknownRequest(id) => write!(f, "unknown request id {}", id),
            PipelineError::UnknownResource(id) => write!(f, "unknown resource id {}", id),
            PipelineError::Transport(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<RequestError> for PipelineError {
    fn from(err: RequestError) -> Self {
        PipelineError::Transport(err)
    }
}
