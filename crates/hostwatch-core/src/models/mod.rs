//! Data models for the hostwatch API.
//!
//! This module contains the wire types exchanged with the backend:
//!
//! - `User`, `LoginRequest`, `LoginResponse`: authentication
//! - `Server`, `ServerInput`, `ServerUpdate`: managed hosts
//! - Check results: `CheckResult`, `CheckAllEntry`, `PasswordCheck`,
//!   `PortCheck`, `SystemInfo`

pub mod server;
pub mod user;

pub use server::{
    CheckAllEntry, CheckResult, PasswordCheck, PortCheck, Server, ServerId, ServerInput,
    ServerStatus, ServerUpdate, StatusInfo, SystemInfo,
};
pub use user::{LoginRequest, LoginResponse, MessageResponse, RefreshResponse, User};
