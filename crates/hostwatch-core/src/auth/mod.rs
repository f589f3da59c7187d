//! Authentication module for managing sessions and credentials.
//!
//! This module provides:
//! - `CredentialStore`: the key-value seam holding `token` and `user`, with
//!   in-memory, file and OS keychain backends
//! - `SessionInvalidator`: clears the store and redirects on an expired session
//! - `Session`: login/logout/refresh workflow over the auth endpoints

pub mod file_store;
pub mod invalidator;
pub mod keyring_store;
pub mod session;
pub mod store;

pub use file_store::FileCredentialStore;
pub use invalidator::{Invalidation, SessionInvalidator, SESSION_EXPIRED_MESSAGE};
pub use keyring_store::KeyringCredentialStore;
pub use session::{Session, SessionError};
pub use store::{CredentialStore, MemoryCredentialStore, StoreError, TOKEN_KEY, USER_KEY};
