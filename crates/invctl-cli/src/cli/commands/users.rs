//! User administration handlers (security admins only).

use anyhow::{Context, Result};
use invctl_core::users::{NewUser, UserId};
use invctl_core::{Config, Session};

use super::{Client, confirm, open_client, require_session};
use crate::render;

fn admin_client(config: &Config) -> Result<(Client, Session)> {
    let mut client = open_client(config)?;
    let session = require_session(&mut client)?;
    if !session.role.can_manage_users() {
        anyhow::bail!(
            "Your role ({}) may not manage users.",
            session.role.label()
        );
    }
    Ok((client, session))
}

pub async fn list(config: &Config) -> Result<()> {
    let (client, _) = admin_client(config)?;
    let users = client.list_users().await.context("list users")?;
    if users.is_empty() {
        println!("No users found.");
    } else {
        println!("{}", render::user_table(&users));
    }
    Ok(())
}

pub async fn create(config: &Config, new_user: &NewUser) -> Result<()> {
    let (client, _) = admin_client(config)?;
    let id = client.create_user(new_user).await.context("create user")?;
    println!("Created user {} ({}).", id, new_user.username.trim());
    Ok(())
}

pub async fn delete(config: &Config, id: UserId, yes: bool) -> Result<()> {
    let (client, session) = admin_client(config)?;
    if id == session.user_id {
        anyhow::bail!("You cannot delete your own account.");
    }

    if !yes && !confirm(&format!("Delete user {id}?"))? {
        println!("Cancelled.");
        return Ok(());
    }

    let message = client
        .delete_user(id)
        .await
        .with_context(|| format!("delete user {id}"))?;
    println!("{message}");
    Ok(())
}
