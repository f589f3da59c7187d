//! User feedback port.
//!
//! The pipeline decides *what* to tell the user and *when*; rendering is up
//! to whoever implements `Notifier` (a terminal, a toast, a log line).

use std::fmt;

use tracing::{error, warn};

use crate::api::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub classification: Classification,
    pub message: String,
}

impl Notification {
    pub fn new(classification: Classification, message: impl Into<String>) -> Self {
        Self {
            severity: classification.severity(),
            classification,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Notifier that only writes to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity {
            Severity::Warning => warn!(
                classification = ?notification.classification,
                "{}",
                notification.message
            ),
            Severity::Error => error!(
                classification = ?notification.classification,
                "{}",
                notification.message
            ),
        }
    }
}
