//! Navigation port used when a session ends.

use std::sync::RwLock;

use tracing::info;

/// Unauthenticated entry view.
pub const LOGIN_PATH: &str = "/login";

pub trait Navigator: Send + Sync {
    /// Path of the view the application is currently showing.
    fn current_path(&self) -> String;

    fn redirect(&self, path: &str);
}

/// Whether `location` points at `target`, ignoring query, fragment and a
/// trailing slash.
pub fn is_at(location: &str, target: &str) -> bool {
    let path = location.split(['?', '#']).next().unwrap_or(location);
    let path = path.trim_end_matches('/');
    let target = target.trim_end_matches('/');
    path == target
}

/// In-process route holder. `redirect` just moves the current path.
#[derive(Debug)]
pub struct RouteState {
    path: RwLock<String>,
}

impl RouteState {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(initial.into()),
        }
    }

    pub fn is_at_login(&self) -> bool {
        is_at(&self.current_path(), LOGIN_PATH)
    }

    pub fn set(&self, path: impl Into<String>) {
        let mut guard = self.path.write().unwrap_or_else(|e| e.into_inner());
        *guard = path.into();
    }
}

impl Default for RouteState {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for RouteState {
    fn current_path(&self) -> String {
        self.path.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn redirect(&self, path: &str) {
        info!(to = path, "Redirecting");
        self.set(path);
    }
}
