//! Managed server records and the results of checks run against them.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type ServerId = i64;

/// Default SSH port assumed when none is given.
pub const DEFAULT_SSH_PORT: u16 = 22;

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Online,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Online => write!(f, "online"),
            ServerStatus::Offline => write!(f, "offline"),
            ServerStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub id: ServerId,
    pub ip_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ServerStatus,
    #[serde(default)]
    pub last_checked: Option<NaiveDateTime>,
    #[serde(default)]
    pub os_info: Option<String>,
    #[serde(default)]
    pub cpu_info: Option<String>,
    #[serde(default)]
    pub memory_info: Option<String>,
    #[serde(default)]
    pub disk_info: Option<String>,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Server {
    /// `ip:port` for display.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip_address, self.port)
    }

    pub fn last_checked_display(&self) -> String {
        match self.last_checked {
            Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
            None => "never".to_string(),
        }
    }
}

/// Body for `POST /servers`. The password is encrypted server-side.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInput {
    pub ip_address: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `PUT /servers/{id}`. Only fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ServerUpdate {
    pub fn is_empty(&self) -> bool {
        self.ip_address.is_none()
            && self.port.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.notes.is_none()
    }
}

/// Outcome of a ping + port (+ SSH auth) probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInfo {
    pub ping: bool,
    pub port: bool,
    /// `None` when authentication was not attempted (port closed).
    #[serde(default)]
    pub auth: Option<bool>,
    pub overall: ServerStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub server_id: ServerId,
    pub status: StatusInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAllEntry {
    pub server_id: ServerId,
    pub ip_address: String,
    pub status: StatusInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordCheck {
    pub server_id: ServerId,
    pub password_valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortCheck {
    pub server_id: ServerId,
    pub port: u16,
    pub is_open: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub disk: Option<String>,
    pub uptime: Option<String>,
}
