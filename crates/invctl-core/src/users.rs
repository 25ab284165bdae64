//! User accounts, managed by security admins.

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};
use crate::session::Role;

pub type UserId = i64;

/// A user account as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    #[serde(alias = "nome", alias = "display_name")]
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Input for creating an account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Option<Role>,
    pub display_name: String,
    pub email: Option<String>,
}

impl NewUser {
    /// # Errors
    /// Returns a `Validation` error when a required field is blank.
    pub(crate) fn validate(&self) -> ClientResult<NewUserBody<'_>> {
        let username = self.username.trim();
        let display_name = self.display_name.trim();
        let missing_field = || {
            ClientError::validation(
                "Please fill in all required fields: username, password, role and name.",
            )
        };
        if username.is_empty() || self.password.is_empty() || display_name.is_empty() {
            return Err(missing_field());
        }
        let role = self.role.ok_or_else(missing_field)?;
        Ok(NewUserBody {
            username,
            password: &self.password,
            role: role.server_id(),
            nome: display_name,
            email: self
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty()),
        })
    }
}

/// Wire body for `POST /users`, in the server's vocabulary.
#[derive(Debug, Serialize)]
pub(crate) struct NewUserBody<'a> {
    username: &'a str,
    password: &'a str,
    role: &'static str,
    nome: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateUserResponse {
    #[serde(default, rename = "userId", alias = "user_id", alias = "id")]
    pub user_id: Option<UserId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientErrorKind;

    #[test]
    fn test_user_account_from_server() {
        let json = r#"{"id":2,"username":"gerente","role":"gerente","nome":"Lucius Fox","email":"lucius.fox@waynecorp.com"}"#;
        let user: UserAccount = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Manager);
        assert_eq!(user.display_name, "Lucius Fox");
    }

    #[test]
    fn test_new_user_body_uses_server_role() {
        let new_user = NewUser {
            username: " alfred ".to_string(),
            password: "secret".to_string(),
            role: Some(Role::Employee),
            display_name: "Alfred Pennyworth".to_string(),
            email: Some("  ".to_string()),
        };
        let body = serde_json::to_value(new_user.validate().unwrap()).unwrap();
        assert_eq!(body["username"], "alfred");
        assert_eq!(body["role"], "funcionario");
        assert_eq!(body["nome"], "Alfred Pennyworth");
        assert!(body.get("email").is_none());
    }

    #[test]
    fn test_new_user_requires_role_and_password() {
        let new_user = NewUser {
            username: "alfred".to_string(),
            display_name: "Alfred".to_string(),
            ..Default::default()
        };
        assert_eq!(
            new_user.validate().unwrap_err().kind,
            ClientErrorKind::Validation
        );
    }
}
