//! Login, logout and whoami.

use anyhow::{Context, Result};
use invctl_core::Config;
use invctl_core::permissions::permitted_actions;

use super::{open_client, prompt, require_session};
use crate::render;

pub async fn login(config: &Config, username: Option<String>, password: Option<String>) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    // Read from the terminal without echo.
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("read password")?,
    };

    let mut client = open_client(config)?;
    let session = client
        .authenticate(&username, &password)
        .await
        .context("login")?;

    println!("Logged in as {}.", session.headline());
    Ok(())
}

pub fn logout(config: &Config) -> Result<()> {
    let mut client = open_client(config)?;
    let had_session = client.restore_session().is_some();
    client.end_session().context("logout")?;

    if had_session {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub fn whoami(config: &Config) -> Result<()> {
    let mut client = open_client(config)?;
    let session = require_session(&mut client)?;

    println!("{}", session.headline());
    println!("Username: {}", session.username);
    println!("Server:   {}", client.base_url());
    println!(
        "Actions:  {}",
        render::actions(&permitted_actions(session.role))
    );
    Ok(())
}
