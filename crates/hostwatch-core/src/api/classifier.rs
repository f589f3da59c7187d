//! Failure classification and the reactions attached to each class.

use std::sync::Arc;

use reqwest::StatusCode;
use tracing::debug;

use crate::auth::SessionInvalidator;
use crate::notify::{Notification, Notifier, Severity};

use super::pipeline::ResponseStage;
use super::request::{Outcome, RequestDescriptor};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please check your connection";
pub const FORBIDDEN_MESSAGE: &str = "Access denied";
pub const NOT_FOUND_MESSAGE: &str = "Resource not found";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please retry later";
pub const SERVER_ERROR_MESSAGE: &str = "Server error, please retry later";
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Unauthenticated,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
    NetworkUnreachable,
    Other,
}

impl Classification {
    /// Bucket for a received status; `None` for anything below 400.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status.as_u16() {
            0..=399 => None,
            401 => Some(Classification::Unauthenticated),
            403 => Some(Classification::Forbidden),
            404 => Some(Classification::NotFound),
            429 => Some(Classification::RateLimited),
            500 => Some(Classification::ServerError),
            _ => Some(Classification::Other),
        }
    }

    pub fn of(outcome: &Outcome) -> Option<Self> {
        match outcome {
            Ok(_) => None,
            Err(e) => e.classification(),
        }
    }

    /// Fixed user-facing text. `Other` uses the server's message when there
    /// is one, so this is only its fallback.
    pub fn default_message(&self) -> &'static str {
        match self {
            Classification::Unauthenticated => crate::auth::SESSION_EXPIRED_MESSAGE,
            Classification::Forbidden => FORBIDDEN_MESSAGE,
            Classification::NotFound => NOT_FOUND_MESSAGE,
            Classification::RateLimited => RATE_LIMITED_MESSAGE,
            Classification::ServerError => SERVER_ERROR_MESSAGE,
            Classification::NetworkUnreachable => NETWORK_ERROR_MESSAGE,
            Classification::Other => GENERIC_ERROR_MESSAGE,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Classification::ServerError | Classification::NetworkUnreachable => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

/// Response stage that reacts to failures and leaves the outcome alone.
///
/// `Unauthenticated` always hands off to the session invalidator. Every
/// other class produces a notification, unless notifications are disabled.
pub struct ResponseClassifier {
    notifier: Arc<dyn Notifier>,
    invalidator: Arc<SessionInvalidator>,
    notifications_enabled: bool,
}

impl ResponseClassifier {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        invalidator: Arc<SessionInvalidator>,
        notifications_enabled: bool,
    ) -> Self {
        Self {
            notifier,
            invalidator,
            notifications_enabled,
        }
    }
}

impl ResponseStage for ResponseClassifier {
    fn name(&self) -> &'static str {
        "response-classifier"
    }

    fn observe(&self, request: &RequestDescriptor, outcome: &Outcome) {
        let Err(error) = outcome else {
            return;
        };
        let Some(classification) = error.classification() else {
            debug!(path = request.path(), error = %error, "Unclassified failure");
            return;
        };

        debug!(
            method = %request.method(),
            path = request.path(),
            status = ?error.status().map(|s| s.as_u16()),
            ?classification,
            "Request failed"
        );

        if classification == Classification::Unauthenticated {
            self.invalidator.invalidate();
            return;
        }

        if !self.notifications_enabled {
            return;
        }

        let message = match classification {
            Classification::Other => error.message().unwrap_or(GENERIC_ERROR_MESSAGE),
            other => other.default_message(),
        };
        self.notifier.notify(&Notification::new(classification, message));
    }
}
