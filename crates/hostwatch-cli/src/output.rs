//! Terminal rendering for notifications and API results.

use hostwatch_core::models::{
    CheckAllEntry, CheckResult, PasswordCheck, PortCheck, Server, StatusInfo, SystemInfo, User,
};
use hostwatch_core::{Notification, Notifier};

/// Width of the notes column in the server table
const NOTES_WIDTH: usize = 30;

/// Prints notifications to stderr so stdout stays machine-readable.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        eprintln!("{}: {}", notification.severity, notification.message);
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn or_dash(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

pub fn server_table(servers: &[Server]) -> String {
    if servers.is_empty() {
        return "No servers registered".to_string();
    }
    let mut out = format!(
        "{:<6} {:<22} {:<12} {:<8} {:<17} {}\n",
        "ID", "ADDRESS", "USER", "STATUS", "LAST CHECKED", "NOTES"
    );
    for server in servers {
        out.push_str(&format!(
            "{:<6} {:<22} {:<12} {:<8} {:<17} {}\n",
            server.id,
            truncate(&server.address(), 22),
            truncate(&server.username, 12),
            server.status.to_string(),
            server.last_checked_display(),
            truncate(or_dash(&server.notes), NOTES_WIDTH),
        ));
    }
    out.trim_end().to_string()
}

pub fn server_detail(server: &Server) -> String {
    [
        format!("Server #{}", server.id),
        format!("  Address:      {}", server.address()),
        format!("  User:         {}", server.username),
        format!("  Status:       {}", server.status),
        format!("  Last checked: {}", server.last_checked_display()),
        format!("  OS:           {}", or_dash(&server.os_info)),
        format!("  CPU:          {}", or_dash(&server.cpu_info)),
        format!("  Memory:       {}", or_dash(&server.memory_info)),
        format!("  Disk:         {}", or_dash(&server.disk_info)),
        format!("  Uptime:       {}", or_dash(&server.uptime)),
        format!("  Notes:        {}", or_dash(&server.notes)),
    ]
    .join("\n")
}

fn status_line(status: &StatusInfo) -> String {
    let auth = match status.auth {
        Some(ok) => yes_no(ok),
        None => "not tried",
    };
    format!(
        "{} (ping: {}, port: {}, auth: {})",
        status.overall,
        yes_no(status.ping),
        yes_no(status.port),
        auth
    )
}

pub fn check_result(result: &CheckResult) -> String {
    format!("Server #{}: {}", result.server_id, status_line(&result.status))
}

pub fn check_all(entries: &[CheckAllEntry]) -> String {
    if entries.is_empty() {
        return "No servers registered".to_string();
    }
    entries
        .iter()
        .map(|e| format!("#{:<5} {:<16} {}", e.server_id, e.ip_address, status_line(&e.status)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn password_check(check: &PasswordCheck) -> String {
    if check.password_valid {
        format!("Server #{}: password accepted", check.server_id)
    } else {
        format!("Server #{}: password rejected", check.server_id)
    }
}

pub fn port_check(check: &PortCheck) -> String {
    let state = if check.is_open { "open" } else { "closed" };
    format!("Server #{}: port {} is {}", check.server_id, check.port, state)
}

pub fn system_info(info: &SystemInfo) -> String {
    [
        format!("OS:     {}", or_dash(&info.os)),
        format!("CPU:    {}", or_dash(&info.cpu)),
        format!("Memory: {}", or_dash(&info.memory)),
        format!("Disk:   {}", or_dash(&info.disk)),
        format!("Uptime: {}", or_dash(&info.uptime)),
    ]
    .join("\n")
}

pub fn user(user: &User) -> String {
    match user.created_at {
        Some(created) => format!(
            "{} (id {}, since {})",
            user.username,
            user.id,
            created.format("%b %d, %Y")
        ),
        None => format!("{} (id {})", user.username, user.id),
    }
}
