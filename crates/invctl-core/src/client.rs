//! Session & resource client.
//!
//! Owns the current session and a mirror of the server's resource
//! collection. The mirror is only ever replaced wholesale by a successful
//! listing; create, update and delete leave it alone so callers re-list.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ClientError, ClientErrorKind, ClientResult, server_message};
use crate::resource::{CreateResourceResponse, Resource, ResourceDraft, ResourceId};
use crate::session::{LoginRequest, LoginResponse, Session};
use crate::storage::SessionStore;
use crate::users::{CreateUserResponse, NewUser, UserAccount, UserId};

/// User-Agent header for API requests.
pub const USER_AGENT: &str = concat!("invctl/", env!("CARGO_PKG_VERSION"));

const LOGIN_REJECTED: &str = "Login failed. Check your username and password.";
const LOGIN_FAILED: &str = "Login failed. The server could not process the request.";

/// Credentials are only to blame when the server says so.
fn login_fallback(status: u16) -> &'static str {
    match status {
        401 | 403 => LOGIN_REJECTED,
        _ => LOGIN_FAILED,
    }
}

/// A resource deletion that has been requested but not yet confirmed.
///
/// Only [`InventoryClient::stage_deletion`] creates one, and
/// [`InventoryClient::confirm_deletion`] consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    id: ResourceId,
    name: Option<String>,
}

impl PendingDeletion {
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Name of the resource, when the cache knew it at staging time.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Short description for a confirmation prompt.
    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("resource {} ({name})", self.id),
            None => format!("resource {}", self.id),
        }
    }
}

/// Stateful client for the inventory API.
pub struct InventoryClient<S: SessionStore> {
    http: reqwest::Client,
    base_url: String,
    store: S,
    session: Option<Session>,
    resources: Vec<Resource>,
}

impl<S: SessionStore> InventoryClient<S> {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    /// Returns a `Network` error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>, store: S) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ClientError::network(&e))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            session: None,
            resources: Vec::new(),
        })
    }

    /// Creates a client using the configured URL and timeout.
    ///
    /// # Errors
    /// Returns an error if the configured URL is invalid.
    pub fn from_config(config: &Config, store: S) -> anyhow::Result<Self> {
        let base_url = config.effective_api_url()?;
        Ok(Self::new(&base_url, config.request_timeout(), store)?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resources as of the last successful listing.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn cached_resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Logs in and persists the resulting session.
    ///
    /// On any failure no session is stored and the previous in-memory
    /// session, if any, is kept.
    ///
    /// # Errors
    /// `Validation` for blank input, `Auth` when the server rejects the
    /// credentials, `Api`/`Network` otherwise, `Storage` if the session
    /// cannot be persisted.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> ClientResult<Session> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ClientError::validation(
                "Please enter both username and password.",
            ));
        }

        info!(username, "logging in");
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { username, password });

        let body = self.execute_with(request, login_fallback).await?;

        let session = parse_json::<LoginResponse>(&body, "login")?.into_session();
        if session.auth_token.trim().is_empty() {
            return Err(ClientError::new(
                ClientErrorKind::Api,
                "Server accepted the login but returned no token.",
            ));
        }

        self.store
            .save(&session)
            .map_err(|e| ClientError::storage(format!("Could not save session: {e:#}")))?;
        info!(user_id = session.user_id, role = session.role.id(), "logged in");
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Forgets the session locally and in storage. Never calls the server.
    ///
    /// The resource cache is discarded as well.
    ///
    /// # Errors
    /// Returns a `Storage` error if the stored record cannot be removed;
    /// the in-memory state is cleared regardless.
    pub fn end_session(&mut self) -> ClientResult<()> {
        if let Some(session) = self.session.take() {
            info!(username = %session.username, "logging out");
        }
        self.resources.clear();
        self.store
            .clear()
            .map_err(|e| ClientError::storage(format!("Could not clear session: {e:#}")))
    }

    /// Loads a previously persisted session.
    ///
    /// Returns `None` unless the stored record has user identity and a
    /// token; the caller should then route to login.
    pub fn restore_session(&mut self) -> Option<Session> {
        let stored = match self.store.load() {
            Ok(stored) => stored?,
            Err(err) => {
                warn!("ignoring unreadable session record: {err:#}");
                return None;
            }
        };

        let Some(session) = stored.into_session() else {
            debug!("stored session is incomplete; treating as logged out");
            return None;
        };
        debug!(user_id = session.user_id, "restored session");
        self.session = Some(session.clone());
        Some(session)
    }

    /// Fetches the full collection and replaces the cache with it.
    ///
    /// # Errors
    /// `Auth` on 401/403 or without a session, `Api`/`Network` otherwise.
    /// The cache is left untouched on failure.
    pub async fn list_resources(&mut self) -> ClientResult<&[Resource]> {
        let request = self.http.get(self.url("/resources")).bearer_auth(self.token()?);
        let body = self.execute(request, "Failed to load resources.").await?;

        let resources: Vec<Resource> = parse_json(&body, "resource list")?;
        debug!(count = resources.len(), "resource cache replaced");
        self.resources = resources;
        Ok(&self.resources)
    }

    /// Creates a resource after validating the draft locally.
    ///
    /// # Errors
    /// `Validation` before any request; otherwise as for `list_resources`,
    /// with server validation messages surfaced as `Api`.
    pub async fn create_resource(&self, draft: &ResourceDraft) -> ClientResult<Resource> {
        let payload = draft.validate()?;
        let request = self
            .http
            .post(self.url("/resources"))
            .bearer_auth(self.token()?)
            .json(&payload);
        let body = self.execute(request, "Failed to add resource.").await?;

        let created: CreateResourceResponse = parse_json(&body, "create resource")?;
        if let Some(message) = &created.message {
            debug!(%message, "resource created");
        }
        match (created.resource, created.resource_id) {
            (Some(resource), _) => Ok(resource),
            (None, Some(id)) => Ok(payload.into_resource(id)),
            (None, None) => Err(ClientError::new(
                ClientErrorKind::Api,
                "Server created the resource but did not return its id.",
            )),
        }
    }

    /// Replaces the fields of resource `id` with the draft.
    ///
    /// `id` must come from the server; an id missing from the cache is a
    /// caller error and is only logged.
    ///
    /// # Errors
    /// As for `create_resource`; an unknown id yields the server's `Api` error.
    pub async fn update_resource(
        &self,
        id: ResourceId,
        draft: &ResourceDraft,
    ) -> ClientResult<Resource> {
        let payload = draft.validate()?;
        if !self.resources.is_empty() && self.cached_resource(id).is_none() {
            debug!(id, "updating a resource the cache does not know");
        }

        let request = self
            .http
            .put(self.url(&format!("/resources/{id}")))
            .bearer_auth(self.token()?)
            .json(&payload);
        self.execute(request, "Failed to update resource.").await?;

        Ok(payload.into_resource(id))
    }

    /// First step of a deletion: records the intent without calling the server.
    pub fn stage_deletion(&self, id: ResourceId) -> PendingDeletion {
        PendingDeletion {
            id,
            name: self.cached_resource(id).map(|r| r.name.clone()),
        }
    }

    /// Second step of a deletion. Returns the server's confirmation message.
    ///
    /// # Errors
    /// `Api` when the id does not exist (404), `Auth` when the role may not
    /// delete, `Network` on transport failure.
    pub async fn confirm_deletion(&self, pending: PendingDeletion) -> ClientResult<String> {
        let request = self
            .http
            .delete(self.url(&format!("/resources/{}", pending.id)))
            .bearer_auth(self.token()?);
        let body = self.execute(request, "Failed to delete resource.").await?;

        Ok(server_message(&body).unwrap_or_else(|| "Resource deleted.".to_string()))
    }

    /// Lists user accounts (security admins only).
    ///
    /// # Errors
    /// `Auth` when the role may not manage users.
    pub async fn list_users(&self) -> ClientResult<Vec<UserAccount>> {
        let request = self.http.get(self.url("/users")).bearer_auth(self.token()?);
        let body = self.execute(request, "Failed to load users.").await?;
        parse_json(&body, "user list")
    }

    /// Creates a user account and returns its id.
    ///
    /// # Errors
    /// `Validation` for missing fields; `Api` for duplicates (409).
    pub async fn create_user(&self, new_user: &NewUser) -> ClientResult<UserId> {
        let body = new_user.validate()?;
        let request = self
            .http
            .post(self.url("/users"))
            .bearer_auth(self.token()?)
            .json(&body);
        let response = self.execute(request, "Failed to create user.").await?;

        parse_json::<CreateUserResponse>(&response, "create user")?
            .user_id
            .ok_or_else(|| {
                ClientError::new(
                    ClientErrorKind::Api,
                    "Server created the user but did not return its id.",
                )
            })
    }

    /// Deletes a user account. Returns the server's confirmation message.
    ///
    /// # Errors
    /// `Api` when the id does not exist; `Auth` for self-deletion or
    /// insufficient role.
    pub async fn delete_user(&self, id: UserId) -> ClientResult<String> {
        let request = self
            .http
            .delete(self.url(&format!("/users/{id}")))
            .bearer_auth(self.token()?);
        let body = self.execute(request, "Failed to delete user.").await?;

        Ok(server_message(&body).unwrap_or_else(|| "User deleted.".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn token(&self) -> ClientResult<&str> {
        self.session
            .as_ref()
            .map(|s| s.auth_token.as_str())
            .ok_or_else(ClientError::not_authenticated)
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn execute(&self, request: reqwest::RequestBuilder, fallback: &str) -> ClientResult<String> {
        self.execute_with(request, |_| fallback).await
    }

    /// Like [`Self::execute`], picking the fallback message by status.
    async fn execute_with<'a>(
        &self,
        request: reqwest::RequestBuilder,
        fallback: impl Fn(u16) -> &'a str,
    ) -> ClientResult<String> {
        let response = request.send().await.map_err(|e| ClientError::network(&e))?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "response");

        let body = response.text().await.map_err(|e| ClientError::network(&e))?;
        if status.is_success() {
            return Ok(body);
        }

        let err = ClientError::from_status(status.as_u16(), &body, fallback(status.as_u16()));
        debug!(status = status.as_u16(), kind = %err.kind, "request failed: {}", err.message);
        Err(err)
    }
}

fn parse_json<T: DeserializeOwned>(body: &str, what: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::decode(what, &e))
}
