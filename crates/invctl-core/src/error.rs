//! Client error taxonomy.

use std::fmt;

use serde::Deserialize;

/// Categories of client errors, so callers can react per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Local pre-request check failed; nothing was sent.
    Validation,
    /// HTTP 401/403, or no session to authenticate with.
    Auth,
    /// Any other non-2xx response, or an undecodable success body.
    Api,
    /// The request could not complete (connect, timeout, reset).
    Network,
    /// The durable session record could not be written or cleared.
    Storage,
}

impl fmt::Display for ClientErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientErrorKind::Validation => write!(f, "validation"),
            ClientErrorKind::Auth => write!(f, "auth"),
            ClientErrorKind::Api => write!(f, "api"),
            ClientErrorKind::Network => write!(f, "network"),
            ClientErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Structured error carrying a user-facing message.
#[derive(Debug, Clone)]
pub struct ClientError {
    /// Error category
    pub kind: ClientErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Validation, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Storage, message)
    }

    /// Raised when an authenticated call is attempted without a session.
    pub fn not_authenticated() -> Self {
        Self::new(
            ClientErrorKind::Auth,
            "Not logged in. Authenticate before calling the API.",
        )
    }

    /// Classifies a non-2xx response.
    ///
    /// 401 and 403 become `Auth`, everything else `Api`. The server's
    /// `message` field wins over `fallback` when the body carries one.
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let kind = if status == 401 || status == 403 {
            ClientErrorKind::Auth
        } else {
            ClientErrorKind::Api
        };
        let message = server_message(body).unwrap_or_else(|| fallback.to_string());
        Self {
            kind,
            message,
            status: Some(status),
        }
    }

    /// Maps a transport failure from reqwest.
    pub fn network(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out. Check your connection and try again.".to_string()
        } else if err.is_connect() {
            "Could not reach the server. Check your connection.".to_string()
        } else {
            format!("Network error: {err}")
        };
        Self::new(ClientErrorKind::Network, message)
    }

    /// A success response whose body did not match the expected shape.
    pub fn decode(what: &str, err: &serde_json::Error) -> Self {
        Self::new(
            ClientErrorKind::Api,
            format!("Unexpected {what} response from server: {err}"),
        )
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ClientErrorKind::Auth
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Deserialize)]
struct MessageBody {
    message: Option<String>,
}

/// Extracts a non-empty `message` field from a JSON body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let parsed: MessageBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_auth_with_server_message() {
        let err = ClientError::from_status(401, r#"{"message":"invalid credentials"}"#, "fallback");
        assert_eq!(err.kind, ClientErrorKind::Auth);
        assert_eq!(err.message, "invalid credentials");
        assert_eq!(err.status, Some(401));
    }

    #[test]
    fn test_forbidden_maps_to_auth() {
        let err = ClientError::from_status(403, "{}", "no access");
        assert!(err.is_auth());
        assert_eq!(err.message, "no access");
    }

    #[test]
    fn test_other_status_maps_to_api() {
        let err = ClientError::from_status(404, r#"{"message":"Recurso não encontrado."}"#, "x");
        assert_eq!(err.kind, ClientErrorKind::Api);
        assert_eq!(err.message, "Recurso não encontrado.");
    }

    #[test]
    fn test_non_json_body_uses_fallback() {
        let err = ClientError::from_status(502, "<html>Bad Gateway</html>", "Server error.");
        assert_eq!(err.kind, ClientErrorKind::Api);
        assert_eq!(err.message, "Server error.");
    }

    #[test]
    fn test_blank_message_uses_fallback() {
        let err = ClientError::from_status(500, r#"{"message":"   "}"#, "Server error.");
        assert_eq!(err.message, "Server error.");
    }
}
