//! Subcommand handlers.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context as _, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use hostwatch_core::models::{CheckAllEntry, MessageResponse, Server, ServerInput, ServerUpdate};
use hostwatch_core::{ApiResponse, Session, Settings};

use crate::cli::{AddServer, Command, ServersCommand, UpdateServer};
use crate::output;

pub struct Context {
    pub session: Session,
    pub settings: Settings,
    pub json: bool,
}

impl Context {
    /// Print either the raw JSON body or a rendered summary of it.
    fn show<T, F>(&self, response: ApiResponse, render: F) -> Result<()>
    where
        T: DeserializeOwned + Serialize,
        F: FnOnce(&T) -> String,
    {
        let value: T = response.json()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            println!("{}", render(&value));
        }
        Ok(())
    }
}

pub async fn run(ctx: &mut Context, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => login(ctx, username, password).await,
        Command::Logout => {
            let outcome = ctx.session.logout().await?;
            match outcome {
                Ok(_) => println!("Logged out"),
                Err(e) => println!("Logged out locally ({})", e),
            }
            Ok(())
        }
        Command::Whoami => {
            let user = ctx.session.current_user().await?;
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{}", output::user(&user));
            }
            Ok(())
        }
        Command::Refresh => {
            ctx.session.refresh().await?;
            println!("Session refreshed");
            Ok(())
        }
        Command::Servers(command) => servers(ctx, command).await,
    }
}

async fn login(ctx: &mut Context, username: Option<String>, password: Option<String>) -> Result<()> {
    let username = match username.or_else(|| ctx.settings.last_username.clone()) {
        Some(u) => u,
        None => prompt("Username: ")?,
    };
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password(format!("Password for {}: ", username))
            .context("Failed to read password")?,
    };

    let user = ctx.session.login(&username, &password).await?;

    ctx.settings.last_username = Some(username);
    if let Err(e) = ctx.settings.save() {
        tracing::warn!(error = %e, "Failed to save settings");
    }

    println!("Logged in as {}", user.username);
    Ok(())
}

async fn servers(ctx: &Context, command: ServersCommand) -> Result<()> {
    let api = ctx.session.client().servers();
    match command {
        ServersCommand::List => {
            let response = api.list().await?;
            ctx.show(response, |servers: &Vec<Server>| output::server_table(servers))
        }
        ServersCommand::Get { id } => {
            let response = api.get(id).await?;
            ctx.show(response, output::server_detail)
        }
        ServersCommand::Add(add) => {
            let input = server_input(add)?;
            let response = api.create(&input).await?;
            ctx.show(response, |server: &Server| {
                format!("Registered server #{} ({})", server.id, server.address())
            })
        }
        ServersCommand::Update(update) => {
            let id = update.id;
            let changes = server_update(update)?;
            if changes.is_empty() {
                bail!("Nothing to update; pass at least one field");
            }
            let response = api.update(id, &changes).await?;
            ctx.show(response, output::server_detail)
        }
        ServersCommand::Delete { id } => {
            let response = api.delete(id).await?;
            ctx.show(response, |msg: &MessageResponse| msg.message.clone())
        }
        ServersCommand::Check { id } => {
            let response = api.check(id).await?;
            ctx.show(response, output::check_result)
        }
        ServersCommand::CheckAll => {
            let response = api.check_all().await?;
            ctx.show(response, |entries: &Vec<CheckAllEntry>| output::check_all(entries))
        }
        ServersCommand::VerifyPassword { id } => {
            let response = api.verify_password(id).await?;
            ctx.show(response, output::password_check)
        }
        ServersCommand::CheckPort { id } => {
            let response = api.check_port(id).await?;
            ctx.show(response, output::port_check)
        }
        ServersCommand::SystemInfo { id } => {
            let response = api.system_info(id).await?;
            ctx.show(response, output::system_info)
        }
    }
}

fn server_input(add: AddServer) -> Result<ServerInput> {
    let password = match add.password {
        Some(p) => p,
        None => rpassword::prompt_password(format!("SSH password for {}@{}: ", add.username, add.ip_address))
            .context("Failed to read SSH password")?,
    };
    if password.is_empty() {
        bail!("SSH password must not be empty");
    }
    Ok(ServerInput {
        ip_address: add.ip_address,
        port: add.port,
        username: add.username,
        password,
        notes: add.notes,
    })
}

fn server_update(update: UpdateServer) -> Result<ServerUpdate> {
    let password = if update.password {
        Some(rpassword::prompt_password("New SSH password: ").context("Failed to read SSH password")?)
    } else {
        None
    };
    Ok(ServerUpdate {
        ip_address: update.ip_address,
        port: update.port,
        username: update.username,
        password,
        notes: update.notes,
    })
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim().to_string();
    if value.is_empty() {
        bail!("No input given");
    }
    Ok(value)
}
