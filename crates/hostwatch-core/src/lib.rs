//! Core library for hostwatch.
//!
//! An HTTP access layer for the hostwatch server-management API. Every call
//! goes through one pipeline that attaches the stored bearer token, then
//! classifies failures, notifies the user and ends the session when the
//! backend rejects the credential. Callers always get the original outcome
//! back.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;
pub mod notify;

pub use api::{ApiClient, ApiError, ApiResponse, Classification, Outcome, RequestDescriptor};
pub use auth::{CredentialStore, Session};
pub use config::{ClientConfig, Settings};
pub use navigation::{Navigator, RouteState, LOGIN_PATH};
pub use notify::{Notification, Notifier, Severity};
