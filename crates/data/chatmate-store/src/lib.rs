//! # Chatmate Store
//!
//! Contacts and chats live as one pretty-printed JSON file per record:
//!
//! ```text
//! <data>/
//! ├── contacts/<id>.json
//! ├── chats/<id>.json
//! └── uploads/            (served as-is under /uploads)
//! ```
//!
//! Every read-modify-write of a record holds that record's async lock, and
//! every write goes through a temp file + rename. Lock order is always
//! contact before chat.

mod chats;
mod contacts;
mod locks;
mod records;

pub use contacts::DeletedContact;

use locks::RecordLocks;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Contact,
    Chat,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contact => write!(f, "contact"),
            Self::Chat => write!(f, "chat"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: String },

    #[error(transparent)]
    Invalid(#[from] chatmate_core::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn not_found(kind: RecordKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Handle to the data directory
pub struct Store {
    root: PathBuf,
    locks: RecordLocks,
}

impl Store {
    /// Open the store, creating the directory layout if it is missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            root: root.into(),
            locks: RecordLocks::default(),
        };
        store.ensure_layout().await?;
        Ok(store)
    }

    async fn ensure_layout(&self) -> Result<()> {
        for dir in [self.root.clone(), self.contacts_dir(), self.chats_dir(), self.uploads_dir()] {
            if !tokio::fs::try_exists(&dir).await? {
                tokio::fs::create_dir_all(&dir).await?;
                tracing::info!(dir = %dir.display(), "created directory");
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    fn contacts_dir(&self) -> PathBuf {
        self.root.join("contacts")
    }

    fn chats_dir(&self) -> PathBuf {
        self.root.join("chats")
    }
}
