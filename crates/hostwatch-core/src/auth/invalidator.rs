use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::Classification;
use crate::navigation::{is_at, Navigator, LOGIN_PATH};
use crate::notify::{Notification, Notifier};

use super::store::CredentialStore;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// What a call to [`SessionInvalidator::invalidate`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Store cleared, user notified (if enabled) and sent to the login view.
    Redirected,
    /// Store cleared; another invalidation already redirected.
    AlreadyInvalidated,
    /// Store cleared; already on the login view so nothing else fired.
    Suppressed,
}

/// Ends the current session after the server rejected the credential.
///
/// Clearing is unconditional. The notify-and-redirect part is latched so
/// any number of overlapping 401s yield one redirect; a successful login
/// re-arms it through [`SessionInvalidator::rearm`].
pub struct SessionInvalidator {
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    notifications_enabled: bool,
    fired: AtomicBool,
}

impl SessionInvalidator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        notifications_enabled: bool,
    ) -> Self {
        Self {
            store,
            notifier,
            navigator,
            notifications_enabled,
            fired: AtomicBool::new(false),
        }
    }

    pub fn invalidate(&self) -> Invalidation {
        if let Err(e) = self.store.clear_session() {
            warn!(error = %e, "Failed to clear credential store");
        }

        if is_at(&self.navigator.current_path(), LOGIN_PATH) {
            debug!("Already on login view, suppressing redirect");
            return Invalidation::Suppressed;
        }

        if self.fired.swap(true, Ordering::AcqRel) {
            debug!("Session already invalidated");
            return Invalidation::AlreadyInvalidated;
        }

        info!("Session expired, redirecting to login");
        if self.notifications_enabled {
            self.notifier.notify(&Notification::new(
                Classification::Unauthenticated,
                SESSION_EXPIRED_MESSAGE,
            ));
        }
        self.navigator.redirect(LOGIN_PATH);
        Invalidation::Redirected
    }

    /// Allow the next invalidation to notify and redirect again.
    ///
    /// `Session` calls this whenever it stores a token. Code that writes
    /// `TOKEN_KEY` straight into the store must call it too, or the next
    /// expiry only clears the store.
    pub fn rearm(&self) {
        self.fired.store(false, Ordering::Release);
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}

impl std::fmt::Debug for SessionInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionInvalidator")
            .field("notifications_enabled", &self.notifications_enabled)
            .field("fired", &self.fired.load(Ordering::Acquire))
            .finish()
    }
}
