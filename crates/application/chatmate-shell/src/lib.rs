//! # Chatmate Shell
//!
//! The client side of chatmate, without a renderer:
//!
//! ```text
//! Splash ──complete / timer──▶ Main ──location──▶ Route ──load──▶ Page
//!                               │
//!                 hidden/unload └──▶ AutoSave (logs by default)
//! ```

pub mod client;
pub mod lifecycle;
pub mod pages;
pub mod route;
pub mod shell;

pub use client::{ChatmateClient, Deleted, Health, OneShot, Turn};
pub use lifecycle::{AutoSave, Debounced, LifecycleSignal, LoggingAutoSave};
pub use pages::Page;
pub use route::Route;
pub use shell::{Phase, Shell, View, SPLASH_DURATION};

pub type Result<T> = std::result::Result<T, ShellError>;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
}
