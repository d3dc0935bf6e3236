//! Typed client for the chatmate HTTP API

use chatmate_core::{Chat, ChatSummary, Contact, ContactPatch, Message, NewContact, Personality, Role};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Result, ShellError};

/// `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: String,
    pub message: String,
    pub has_gemini_key: bool,
    pub api_key_length: usize,
    pub encryption_status: String,
    pub key_format: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
    /// Only reported when a contact is removed
    #[serde(default)]
    pub chats_deleted: Option<usize>,
}

/// One completed chat turn
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub reply: String,
    pub source: String,
    pub chat_id: String,
    pub user_message: Message,
    pub assistant_message: Message,
}

/// Reply from the legacy one-shot endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OneShot {
    pub reply: String,
    pub source: String,
}

#[derive(Debug, Serialize)]
struct HistoryTurn<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct ChatmateClient {
    base_url: String,
    http: reqwest::Client,
}

impl ChatmateClient {
    /// Create a client for a server root such as `http://localhost:3001`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        Err(ShellError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn health(&self) -> Result<Health> {
        self.send(self.request(Method::GET, "/api/health")).await
    }

    // Contacts

    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.send(self.request(Method::GET, "/api/contacts")).await
    }

    pub async fn get_contact(&self, id: &str) -> Result<Contact> {
        self.send(self.request(Method::GET, &format!("/api/contacts/{id}"))).await
    }

    pub async fn create_contact(&self, input: &NewContact) -> Result<Contact> {
        self.send(self.request(Method::POST, "/api/contacts").json(input)).await
    }

    pub async fn update_contact(&self, id: &str, patch: &ContactPatch) -> Result<Contact> {
        self.send(self.request(Method::PUT, &format!("/api/contacts/{id}")).json(patch))
            .await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<Deleted> {
        self.send(self.request(Method::DELETE, &format!("/api/contacts/{id}"))).await
    }

    pub async fn contact_chats(&self, contact_id: &str) -> Result<Vec<ChatSummary>> {
        self.send(self.request(Method::GET, &format!("/api/contacts/{contact_id}/chats")))
            .await
    }

    // Chats

    pub async fn list_chats(&self, contact_id: Option<&str>) -> Result<Vec<ChatSummary>> {
        let mut builder = self.request(Method::GET, "/api/chats");
        if let Some(id) = contact_id {
            builder = builder.query(&[("contactId", id)]);
        }
        self.send(builder).await
    }

    pub async fn create_chat(&self, contact_id: &str, title: Option<&str>) -> Result<Chat> {
        let body = json!({ "contactId": contact_id, "title": title });
        self.send(self.request(Method::POST, "/api/chats").json(&body)).await
    }

    pub async fn get_chat(&self, id: &str) -> Result<Chat> {
        self.send(self.request(Method::GET, &format!("/api/chats/{id}"))).await
    }

    pub async fn messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        self.send(self.request(Method::GET, &format!("/api/chats/{chat_id}/messages")))
            .await
    }

    pub async fn delete_chat(&self, id: &str) -> Result<Deleted> {
        self.send(self.request(Method::DELETE, &format!("/api/chats/{id}"))).await
    }

    /// Send one user message. `id` may be a chat id or a contact id.
    pub async fn send_message(&self, id: &str, text: &str) -> Result<Turn> {
        let body = json!({ "text": text });
        self.send(self.request(Method::POST, &format!("/api/chats/{id}/messages")).json(&body))
            .await
    }

    /// Stateless reply for the legacy chat page; nothing is stored server-side.
    pub async fn one_shot(&self, message: &str, personality: &Personality, history: &[Message]) -> Result<OneShot> {
        let history: Vec<HistoryTurn<'_>> = history
            .iter()
            .map(|m| HistoryTurn {
                role: m.role,
                content: &m.content,
            })
            .collect();
        let body = json!({
            "message": message,
            "personality": personality,
            "history": history,
        });
        self.send(self.request(Method::POST, "/api/chat").json(&body)).await
    }
}

impl ShellError {
    /// True for a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ChatmateClient::new("http://localhost:3001/");
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_health_decodes() {
        let body = r#"{"status":"ok","message":"API is running","hasGeminiKey":false,
            "apiKeyLength":0,"encryptionStatus":"disabled","keyFormat":"invalid"}"#;
        let health: Health = serde_json::from_str(body).unwrap();
        assert!(!health.has_gemini_key);
        assert_eq!(health.key_format, "invalid");
    }

    #[test]
    fn test_deleted_without_cascade_count() {
        let deleted: Deleted = serde_json::from_str(r#"{"id":"c1","deleted":true}"#).unwrap();
        assert_eq!(deleted.chats_deleted, None);
    }
}
