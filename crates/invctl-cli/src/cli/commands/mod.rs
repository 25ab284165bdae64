//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod resources;
pub mod users;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use invctl_core::permissions::{self, Action};
use invctl_core::{ClientError, Config, FileSessionStore, InventoryClient, Session};

pub(crate) type Client = InventoryClient<FileSessionStore>;

/// Builds a client backed by `${INVCTL_HOME}/session.json`.
pub(crate) fn open_client(config: &Config) -> Result<Client> {
    InventoryClient::from_config(config, FileSessionStore::default_location())
        .context("create API client")
}

/// Restores the stored session or fails with an `Auth` error.
pub(crate) fn require_session(client: &mut Client) -> Result<Session> {
    client
        .restore_session()
        .ok_or_else(|| ClientError::not_authenticated().into())
}

/// Refuses locally what the server would reject for this role.
pub(crate) fn ensure_permitted(session: &Session, action: Action) -> Result<()> {
    if !permissions::is_permitted(session.role, action) {
        anyhow::bail!(
            "Your role ({}) may not {} resources.",
            session.role.label(),
            action.verb()
        );
    }
    Ok(())
}

/// Reads one trimmed line from stdin after printing `label` to stderr.
pub(crate) fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    io::stderr().flush().context("flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read from stdin")?;
    Ok(line.trim().to_string())
}

/// Asks a yes/no question; anything but `y`/`yes` means no.
pub(crate) fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N]: "))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
