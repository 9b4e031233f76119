//! Pipeline execution configuration.
//!
//! Timeout, TLS verification and proxy settings belong to the execution
//! environment rather than the pipeline algorithm; they are collected
//! here and applied when the HTTP client is built.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default HTTP timeout, finite so a dead server cannot block the host.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How step results are keyed in the run's result map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKeyStyle {
    /// Positional keys: `step1`, `step2`, ... (1-based).
    Position,

    /// The step's own name.
    Name,
}

/// Configuration for pipeline execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Per-call HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Whether TLS certificates are verified.
    pub verify_tls: bool,

    /// Optional proxy URL applied to every call.
    pub proxy: Option<String>,

    /// How step results are keyed for later steps to reference.
    pub step_key_style: StepKeyStyle,
}

impl ExecutionConfig {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Self::default()
        }
    }

    /// The timeout as a `Duration`.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            verify_tls: true,
            proxy: None,
            step_key_style: StepKeyStyle::Position,
        }
    }
}
