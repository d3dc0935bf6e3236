//! Gemini credential checks
//!
//! The key is plain text from the environment. Validity is decided once,
//! here, and the resulting [`CredentialState`] is shared by the health
//! endpoint and the reply path so the two can never disagree.

use serde::Serialize;
use std::fmt;

/// Values shipped in sample `.env` files that must never be sent upstream.
pub const PLACEHOLDER_KEYS: [&str; 2] = ["your_google_gemini_api_key_here", "your_actual_api_key_here"];

/// Every Google API key starts with this.
pub const KEY_PREFIX: &str = "AIza";

pub const MIN_KEY_LENGTH: usize = 35;

/// Non-empty, not a placeholder, `AIza` prefix, at least 35 characters.
pub fn is_valid_api_key(key: &str) -> bool {
    !key.is_empty()
        && !PLACEHOLDER_KEYS.contains(&key)
        && key.starts_with(KEY_PREFIX)
        && key.len() >= MIN_KEY_LENGTH
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    Valid,
    Invalid,
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => write!(f, "valid"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

/// Why a key was rejected, for startup diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyProblem {
    Missing,
    Placeholder,
    BadPrefix,
    TooShort,
}

impl fmt::Display for KeyProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "key is missing"),
            Self::Placeholder => write!(f, "key is still set to a placeholder value"),
            Self::BadPrefix => write!(f, "key does not start with {KEY_PREFIX}"),
            Self::TooShort => write!(f, "key is shorter than {MIN_KEY_LENGTH} characters"),
        }
    }
}

/// Credential as loaded at startup
#[derive(Clone)]
pub struct CredentialState {
    key: Option<String>,
    valid: bool,
}

impl CredentialState {
    pub fn from_key(key: Option<String>) -> Self {
        let valid = key.as_deref().is_some_and(is_valid_api_key);
        Self { key, valid }
    }

    pub fn missing() -> Self {
        Self::from_key(None)
    }

    /// True when replies may go to the provider.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The key, only when it passed validation.
    pub fn usable_key(&self) -> Option<&str> {
        if self.valid {
            self.key.as_deref()
        } else {
            None
        }
    }

    pub fn is_present(&self) -> bool {
        self.key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn length(&self) -> usize {
        self.key.as_deref().map_or(0, str::len)
    }

    pub fn format(&self) -> KeyFormat {
        if self.valid {
            KeyFormat::Valid
        } else {
            KeyFormat::Invalid
        }
    }

    pub fn problem(&self) -> Option<KeyProblem> {
        let key = match self.key.as_deref() {
            None | Some("") => return Some(KeyProblem::Missing),
            Some(k) => k,
        };
        if PLACEHOLDER_KEYS.contains(&key) {
            Some(KeyProblem::Placeholder)
        } else if !key.starts_with(KEY_PREFIX) {
            Some(KeyProblem::BadPrefix)
        } else if key.len() < MIN_KEY_LENGTH {
            Some(KeyProblem::TooShort)
        } else {
            None
        }
    }

    /// First few characters, safe to print in logs.
    pub fn preview(&self) -> Option<String> {
        self.key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| format!("{}...", k.chars().take(8).collect::<String>()))
    }
}

impl fmt::Debug for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialState")
            .field("present", &self.is_present())
            .field("length", &self.length())
            .field("valid", &self.valid)
            .finish()
    }
}
