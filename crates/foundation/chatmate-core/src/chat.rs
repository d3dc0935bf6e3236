//! Chats and their messages

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message. Never edited after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            role,
            content: content.into(),
            timestamp: crate::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// An ordered message thread owned by exactly one contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub contact_id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(contact_id: impl Into<String>, title: Option<String>) -> Self {
        let now = crate::now();
        Self {
            id: crate::new_id(),
            contact_id: contact_id.into(),
            title: title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "New chat".to_string()),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the end of the thread.
    ///
    /// The stored timestamp is clamped so the thread stays monotonic even if
    /// the wall clock steps backwards between two appends.
    pub fn push(&mut self, mut message: Message) -> Result<Message> {
        if message.content.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        }
        self.updated_at = message.timestamp.max(self.updated_at);
        self.messages.push(message.clone());
        Ok(message)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            contact_id: self.contact_id.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
            last_message: self.last_message().cloned(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// What the chat list shows: everything but the full history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: String,
    pub contact_id: String,
    pub title: String,
    pub message_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_chat_defaults() {
        let chat = Chat::new("contact-1", None);
        assert_eq!(chat.contact_id, "contact-1");
        assert_eq!(chat.title, "New chat");
        assert!(chat.messages.is_empty());

        let titled = Chat::new("contact-1", Some("  Weekend plans ".into()));
        assert_eq!(titled.title, "Weekend plans");
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut chat = Chat::new("c", None);
        for i in 0..5 {
            chat.push(Message::user(format!("msg {i}"))).unwrap();
        }
        let contents: Vec<_> = chat.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["msg 0", "msg 1", "msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_push_clamps_timestamp() {
        let mut chat = Chat::new("c", None);
        let first = chat.push(Message::user("first")).unwrap();

        let mut early = Message::assistant("from the past");
        early.timestamp = first.timestamp - Duration::seconds(30);
        let stored = chat.push(early).unwrap();

        assert_eq!(stored.timestamp, first.timestamp);
        assert!(chat
            .messages
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_push_rejects_empty() {
        let mut chat = Chat::new("c", None);
        assert_eq!(chat.push(Message::user("  ")), Err(Error::EmptyMessage));
        assert!(chat.messages.is_empty());
    }

    #[test]
    fn test_summary() {
        let mut chat = Chat::new("c", None);
        chat.push(Message::user("hi")).unwrap();
        chat.push(Message::assistant("hello!")).unwrap();

        let summary = chat.summary();
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.last_message.unwrap().content, "hello!");
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert_eq!(Role::User.to_string(), "user");
    }
}
