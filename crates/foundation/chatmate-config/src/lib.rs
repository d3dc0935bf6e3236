//! Chatmate configuration
//!
//! Everything comes from the process environment, optionally seeded from a
//! `.env` file in the working directory:
//!
//! | Variable                | Default                                       |
//! |-------------------------|-----------------------------------------------|
//! | `NODE_ENV`              | development (`production` enables the bundle) |
//! | `HOST`                  | `0.0.0.0`                                     |
//! | `PORT`                  | `3001`                                        |
//! | `DATA_DIRECTORY`        | `./data`                                      |
//! | `GOOGLE_GEMINI_API_KEY` | unset                                         |
//! | `GEMINI_MODEL`          | `gemini-1.5-flash`                            |
//! | `GEMINI_API_BASE`       | `https://generativelanguage.googleapis.com`   |
//! | `CLIENT_DIST`           | `./dist`                                      |

use chatmate_core::CredentialState;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATA_DIRECTORY: &str = "./data";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CLIENT_DIST: &str = "./dist";

/// Environment variable holding the Gemini key
pub const API_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    fn from_node_env(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: RunMode,
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub client_dist: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::Development,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            client_dist: PathBuf::from(DEFAULT_CLIENT_DIST),
        }
    }
}

/// Load `.env` into the process environment if one exists.
///
/// Returns the path that was loaded. Variables already set win over the file.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("failed to read .env: {}", e);
            None
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => defaults.port,
        };

        Ok(Self {
            mode: RunMode::from_node_env(lookup("NODE_ENV").as_deref()),
            host: non_empty("HOST").unwrap_or(defaults.host),
            port,
            data_dir: non_empty("DATA_DIRECTORY")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            // Kept verbatim; an empty value still counts as "present but invalid".
            gemini_api_key: lookup(API_KEY_VAR),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_api_base: non_empty("GEMINI_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or(defaults.gemini_api_base),
            client_dist: non_empty("CLIENT_DIST")
                .map(PathBuf::from)
                .unwrap_or(defaults.client_dist),
        })
    }

    /// Point the server at a data directory (tests and embedding).
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(key.into());
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.gemini_api_base = base.into();
        self
    }

    pub fn is_production(&self) -> bool {
        self.mode == RunMode::Production
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Evaluate the Gemini key once; share the result.
    pub fn credential(&self) -> CredentialState {
        CredentialState::from_key(self.gemini_api_key.clone())
    }

    /// Sanity checks that `from_lookup` can't express through defaults.
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Empty("HOST"));
        }
        if self.gemini_model.trim().is_empty() {
            return Err(ConfigError::Empty("GEMINI_MODEL"));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty("DATA_DIRECTORY"));
        }
        Ok(())
    }
}
