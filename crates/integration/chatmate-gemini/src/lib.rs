//! # Chatmate Gemini
//!
//! Produces one reply for a chat turn.
//!
//! ```text
//! credential valid? ──no──────────────────────────▶ fallback reply
//!        │yes
//!        ▼
//! Gemini generateContent ──error──▶ warn! ────────▶ fallback reply
//!        │ok
//!        ▼
//! provider text, unmodified
//! ```
//!
//! Callers never see a provider error. There is no timeout and no retry:
//! the turn waits for the provider's single answer.

pub mod client;
pub mod engine;
pub mod fallback;
pub mod provider;

pub use client::GeminiClient;
pub use engine::{Reply, ReplyEngine, ReplySource};
pub use fallback::fallback_reply;
pub use provider::{ReplyProvider, ReplyRequest};

pub type Result<T> = std::result::Result<T, ReplyError>;

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("provider response had no text")]
    EmptyResponse,

    #[error("nothing to reply to")]
    EmptyHistory,
}
