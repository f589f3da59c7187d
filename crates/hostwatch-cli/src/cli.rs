use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hostwatch_core::models::ServerId;

#[derive(Debug, Parser)]
#[command(name = "hostwatch", version, about = "Manage and check remote servers")]
pub struct Cli {
    /// API base URL (absolute, or a path resolved against the origin)
    #[arg(long, global = true, env = "HOSTWATCH_API_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds, 0 for none
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Do not print failure notifications
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Keep the session token in the OS keychain instead of a file
    #[arg(long, global = true)]
    pub keyring: bool,

    /// Print raw JSON responses
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long, global = true, env = "HOSTWATCH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long, short)]
        username: Option<String>,

        #[arg(long, env = "HOSTWATCH_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Exchange the session token for a fresh one
    Refresh,
    /// Manage servers
    #[command(subcommand)]
    Servers(ServersCommand),
}

#[derive(Debug, Subcommand)]
pub enum ServersCommand {
    /// List all servers
    List,
    /// Show one server
    Get { id: ServerId },
    /// Register a server
    Add(AddServer),
    /// Change fields of a server
    Update(UpdateServer),
    /// Remove a server
    Delete { id: ServerId },
    /// Ping, port and SSH login check
    Check { id: ServerId },
    /// Check every server
    CheckAll,
    /// Verify the stored SSH password
    VerifyPassword { id: ServerId },
    /// Check whether the SSH port is open
    CheckPort { id: ServerId },
    /// Fetch OS, CPU, memory, disk and uptime
    SystemInfo { id: ServerId },
}

#[derive(Debug, Args)]
pub struct AddServer {
    pub ip_address: String,

    #[arg(long, short, default_value_t = hostwatch_core::models::server::DEFAULT_SSH_PORT)]
    pub port: u16,

    #[arg(long, short)]
    pub username: String,

    /// Prompted for when omitted
    #[arg(long, env = "HOSTWATCH_SERVER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateServer {
    pub id: ServerId,

    #[arg(long)]
    pub ip_address: Option<String>,

    #[arg(long, short)]
    pub port: Option<u16>,

    #[arg(long, short)]
    pub username: Option<String>,

    /// Prompt for a new SSH password
    #[arg(long)]
    pub password: bool,

    #[arg(long)]
    pub notes: Option<String>,
}
