//! hostwatch - command-line client for the server monitoring backend.

mod cli;
mod commands;
mod output;

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hostwatch_core::auth::{CredentialStore, FileCredentialStore, KeyringCredentialStore};
use hostwatch_core::config::CredentialBackend;
use hostwatch_core::{ApiClient, ClientConfig, RouteState, Session, Settings, LOGIN_PATH};

use cli::{Cli, Command};
use commands::Context;
use output::TerminalNotifier;

/// Log file prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "hostwatch.log";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=hostwatch_core=debug).
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn open_store(cli: &Cli, settings: &Settings) -> Result<Arc<dyn CredentialStore>> {
    if cli.keyring || settings.credential_backend == CredentialBackend::Keyring {
        debug!("Using keyring credential store");
        return Ok(Arc::new(KeyringCredentialStore::new()));
    }
    let store = FileCredentialStore::in_dir(&Settings::cache_dir()?);
    debug!(path = %store.path().display(), "Using file credential store");
    Ok(Arc::new(store))
}

fn client_config(cli: &Cli, settings: &Settings) -> Result<ClientConfig> {
    let mut config = ClientConfig::load(settings)?;
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if cli.quiet {
        config.notifications_enabled = false;
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load()?;
    let config = client_config(&cli, &settings)?;
    let store = open_store(&cli, &settings)?;

    // Logging in happens from the login view, so a rejected password does
    // not count as an expired session.
    let is_login = matches!(cli.command, Command::Login { .. });
    let route = Arc::new(RouteState::new(if is_login { LOGIN_PATH } else { "/" }));

    let client = ApiClient::builder(config)
        .store(store)
        .notifier(Arc::new(TerminalNotifier))
        .navigator(route.clone())
        .build()?;
    info!(base_url = client.base_url(), "Client ready");

    let mut ctx = Context {
        session: Session::new(client),
        settings,
        json: cli.json,
    };
    let result = commands::run(&mut ctx, cli.command).await;

    match settle(result, !is_login && route.is_at_login())? {
        Finish::Done => Ok(ExitCode::SUCCESS),
        Finish::Relogin => {
            eprintln!("Run `hostwatch login` to sign in again.");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Finish {
    Done,
    Relogin,
}

/// After a session expiry the notifier has already told the user what
/// happened, so the command's own error is only logged.
fn settle(result: Result<()>, session_expired: bool) -> Result<Finish> {
    if !session_expired {
        return result.map(|()| Finish::Done);
    }
    if let Err(ref e) = result {
        debug!(error = %format!("{:#}", e), "Command failed after session expiry");
    }
    Ok(Finish::Relogin)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
