//! Authenticated user context.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access tier, fixed for the lifetime of a session.
///
/// The server speaks Portuguese (`admin_seguranca`, `gerente`,
/// `funcionario`); both spellings are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "admin_seguranca")]
    AdminSecurity,
    #[serde(alias = "gerente")]
    Manager,
    #[serde(alias = "funcionario")]
    Employee,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::AdminSecurity, Role::Manager, Role::Employee]
    }

    /// Identifier used in config, storage and on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            Role::AdminSecurity => "admin_security",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// Identifier the server stores in its user table.
    pub fn server_id(&self) -> &'static str {
        match self {
            Role::AdminSecurity => "admin_seguranca",
            Role::Manager => "gerente",
            Role::Employee => "funcionario",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::AdminSecurity => "Security Admin",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }

    /// Only security admins may manage user accounts.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::AdminSecurity)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin_security" | "admin-security" | "admin_seguranca" | "admin" => {
                Ok(Role::AdminSecurity)
            }
            "manager" | "gerente" => Ok(Role::Manager),
            "employee" | "funcionario" => Ok(Role::Employee),
            other => Err(format!(
                "Unknown role: {other}. Expected admin_security, manager or employee."
            )),
        }
    }
}

/// Current user's session, including the bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub display_name: String,
    pub auth_token: String,
}

impl Session {
    /// Returns `display_name (Role)`, the header line the dashboard shows.
    pub fn headline(&self) -> String {
        let name = if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        };
        format!("{name} ({})", self.role.label())
    }
}

// Keep the token out of logs and panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("display_name", &self.display_name)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login response.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub user: LoginUser,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(default, alias = "display_name")]
    pub nome: Option<String>,
}

impl LoginResponse {
    pub fn into_session(self) -> Session {
        let display_name = self
            .user
            .nome
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.user.username.clone());
        Session {
            user_id: self.user.id,
            username: self.user.username,
            role: self.user.role,
            display_name,
            auth_token: self.token,
        }
    }
}
