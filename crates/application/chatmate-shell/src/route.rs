//! Client-side routes

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` and `/contacts`
    Contacts,
    /// `/setup`
    Setup,
    /// `/chats/:contactId`
    ChatList { contact_id: String },
    /// `/chat/:chatId`
    Chat { chat_id: String },
    /// `/chat`, the page for local-only conversations from older builds
    LegacyChat,
    /// `/test`
    Test,
    NotFound(String),
}

impl Route {
    /// Resolve a location. Query string, fragment and trailing slashes are ignored.
    pub fn parse(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] | ["contacts"] => Self::Contacts,
            ["setup"] => Self::Setup,
            ["chats", contact_id] => Self::ChatList {
                contact_id: contact_id.to_string(),
            },
            ["chat"] => Self::LegacyChat,
            ["chat", chat_id] => Self::Chat {
                chat_id: chat_id.to_string(),
            },
            ["test"] => Self::Test,
            _ => Self::NotFound(if path.is_empty() { "/".into() } else { path.to_string() }),
        }
    }

    /// Canonical path for this route.
    pub fn path(&self) -> String {
        match self {
            Self::Contacts => "/contacts".into(),
            Self::Setup => "/setup".into(),
            Self::ChatList { contact_id } => format!("/chats/{contact_id}"),
            Self::Chat { chat_id } => format!("/chat/{chat_id}"),
            Self::LegacyChat => "/chat".into(),
            Self::Test => "/test".into(),
            Self::NotFound(path) => path.clone(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contacts => write!(f, "contacts"),
            Self::Setup => write!(f, "setup"),
            Self::ChatList { contact_id } => write!(f, "chat list ({contact_id})"),
            Self::Chat { chat_id } => write!(f, "chat ({chat_id})"),
            Self::LegacyChat => write!(f, "legacy chat"),
            Self::Test => write!(f, "test"),
            Self::NotFound(path) => write!(f, "not found ({path})"),
        }
    }
}
