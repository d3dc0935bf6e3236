//! # Chatmate Core
//!
//! Domain model shared by every chatmate crate.
//!
//! ```text
//! Contact (personality) ──owns──▶ Chat ──append-only──▶ [Message, Message, ...]
//! ```
//!
//! Nothing in here touches the filesystem or the network. The store,
//! the reply engine and the web layer all speak in these types.

pub mod chat;
pub mod contact;
pub mod credential;
pub mod personality;

pub use chat::{Chat, ChatSummary, Message, Role};
pub use contact::{Contact, ContactPatch, NewContact};
pub use credential::{
    is_valid_api_key, CredentialState, KeyFormat, KeyProblem, KEY_PREFIX, MIN_KEY_LENGTH, PLACEHOLDER_KEYS,
};
pub use personality::Personality;

/// Result type for chatmate-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating domain input
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must not be blank")]
    BlankField { field: &'static str },

    #[error("message text must not be empty")]
    EmptyMessage,
}

/// Current UTC time; single source so timestamps stay comparable.
pub fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
