//! Personality tags
//!
//! Contacts carry a free-form personality tag. The known tags drive the
//! system prompt and the canned fallback replies; anything else is stored
//! verbatim and replies like `friendly`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Personality {
    Friendly,
    Professional,
    Funny,
    Romantic,
    Supportive,
    Wise,
    Sarcastic,
    /// Tag we don't know about, kept as the client sent it
    Other(String),
}

impl Personality {
    pub const KNOWN: &'static [Personality] = &[
        Personality::Friendly,
        Personality::Professional,
        Personality::Funny,
        Personality::Romantic,
        Personality::Supportive,
        Personality::Wise,
        Personality::Sarcastic,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "friendly" => Self::Friendly,
            "professional" => Self::Professional,
            "funny" => Self::Funny,
            "romantic" => Self::Romantic,
            "supportive" => Self::Supportive,
            "wise" => Self::Wise,
            "sarcastic" => Self::Sarcastic,
            _ => Self::Other(tag.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
            Self::Funny => "funny",
            Self::Romantic => "romantic",
            Self::Supportive => "supportive",
            Self::Wise => "wise",
            Self::Sarcastic => "sarcastic",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// The known personality replies should follow. Unknown tags fall back
    /// to friendly.
    pub fn effective(&self) -> Personality {
        match self {
            Self::Other(_) => Self::Friendly,
            known => known.clone(),
        }
    }

    /// One-line description used when building the provider's system prompt.
    pub fn describe(&self) -> &'static str {
        match self.effective() {
            Self::Professional => "polite, concise and focused, like a trusted colleague",
            Self::Funny => "playful and witty, quick with a joke",
            Self::Romantic => "warm, affectionate and attentive",
            Self::Supportive => "patient, encouraging and empathetic",
            Self::Wise => "calm and thoughtful, offering perspective",
            Self::Sarcastic => "dry and teasing, but never mean",
            _ => "cheerful, warm and easy to talk to",
        }
    }
}

impl From<String> for Personality {
    fn from(s: String) -> Self {
        Personality::parse(&s)
    }
}

impl From<Personality> for String {
    fn from(p: Personality) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
