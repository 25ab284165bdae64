//! Durable session storage.
//!
//! Only the session is ever persisted; resource data lives in memory for
//! the lifetime of a client. The file store writes `<home>/session.json`
//! with restricted permissions (0600). Tokens are never logged.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::session::{Role, Session};

/// Key under which the session record is stored, distinct from any other
/// cached data.
pub const SESSION_KEY: &str = "invctl.session";

/// A session record as read back from storage.
///
/// Every field is optional so partial or hand-edited records can be
/// rejected cleanly instead of failing to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl StoredSession {
    /// Returns a session only when user identity and a token are present.
    pub fn into_session(self) -> Option<Session> {
        let user_id = self.user_id?;
        let username = self.username.filter(|u| !u.trim().is_empty())?;
        let role = self.role?;
        let auth_token = self.auth_token.filter(|t| !t.trim().is_empty())?;
        let display_name = self
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| username.clone());
        Some(Session {
            user_id,
            username,
            role,
            display_name,
            auth_token,
        })
    }
}

impl From<&Session> for StoredSession {
    fn from(session: &Session) -> Self {
        Self {
            user_id: Some(session.user_id),
            username: Some(session.username.clone()),
            role: Some(session.role),
            display_name: Some(session.display_name.clone()),
            auth_token: Some(session.auth_token.clone()),
        }
    }
}

/// Where the client keeps the session between process runs.
pub trait SessionStore {
    /// Reads the stored record. `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Replaces the stored record.
    ///
    /// # Errors
    /// Returns an error if the record cannot be written.
    fn save(&self, session: &Session) -> Result<()>;

    /// Removes the stored record. Succeeds when nothing is stored.
    ///
    /// # Errors
    /// Returns an error if an existing record cannot be removed.
    fn clear(&self) -> Result<()>;
}

/// Session record in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `${INVCTL_HOME}/session.json`.
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&contents)
            .map(Some)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(&StoredSession::from(session))
            .context("Failed to serialize session")?;

        let tmp_path = self.path.with_extension("json.tmp");
        write_private(&tmp_path, &contents)?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err)
                .with_context(|| format!("Failed to remove session {}", self.path.display())),
        }
    }
}

/// Writes with restricted permissions on unix.
fn write_private(path: &Path, contents: &str) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }

    Ok(())
}

/// In-process key/value store holding serialized records.
///
/// Clones share the same map, so a second client built from a clone sees
/// what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw serialized record, if any.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn raw(&self) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow!("session store lock poisoned"))?;
        Ok(entries.get(SESSION_KEY).cloned())
    }

    /// Stores an arbitrary raw record under the session key.
    ///
    /// # Errors
    /// Returns an error if the lock is poisoned.
    pub fn put_raw(&self, raw: impl Into<String>) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("session store lock poisoned"))?;
        entries.insert(SESSION_KEY.to_string(), raw.into());
        Ok(())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        match self.raw()? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .context("Failed to parse stored session"),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string(&StoredSession::from(session))
            .context("Failed to serialize session")?;
        self.put_raw(raw)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow!("session store lock poisoned"))?;
        entries.remove(SESSION_KEY);
        Ok(())
    }
}
