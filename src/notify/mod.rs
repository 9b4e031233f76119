//! User-visible notifications.
//!
//! Every error and status message the pipeline wants the user to see
//! goes through the [`Notifier`] collaborator; nothing in the engine is
//! meant to crash the host process.

use log::{error, info, warn};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", label)
    }
}

/// Sink for user-visible messages.
pub trait Notifier {
    fn notify(&self, severity: Severity, message: &str);
}

/// Notifier for headless hosts: routes messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info | Severity::Success => info!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Error => error!("{}", message),
        }
    }
}
