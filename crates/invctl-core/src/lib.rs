//! Core invctl library (session, resource client, views, config).

pub mod client;
pub mod config;
pub mod error;
pub mod permissions;
pub mod resource;
pub mod session;
pub mod storage;
pub mod users;
pub mod views;

pub use client::{InventoryClient, PendingDeletion};
pub use config::Config;
pub use error::{ClientError, ClientErrorKind, ClientResult};
pub use permissions::{Action, permitted_actions};
pub use resource::{Resource, ResourceDraft, ResourceId, ResourceStatus, ResourceType};
pub use session::{Role, Session};
pub use storage::{FileSessionStore, MemorySessionStore, SessionStore};
