//! Google Gemini `generateContent` client

use crate::provider::{ReplyProvider, ReplyRequest};
use crate::{ReplyError, Result};
use async_trait::async_trait;
use chatmate_core::{Message, Role};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const TEMPERATURE: f32 = 0.9;
const MAX_OUTPUT_TOKENS: u32 = 512;

/// Gemini API client. The key is sent as-is; nothing is encrypted.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Map chat history onto Gemini turns.
///
/// Gemini wants the conversation to open with a user turn and to alternate,
/// so leading assistant messages are dropped and consecutive messages from
/// the same side are joined.
fn build_contents(history: &[Message]) -> Vec<Content> {
    let mut contents: Vec<Content> = Vec::new();
    let start = history.iter().position(|m| m.role == Role::User);

    for message in start.map(|i| &history[i..]).unwrap_or(&[]) {
        let role = gemini_role(message.role);
        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => {
                last.parts.push(Part {
                    text: message.content.clone(),
                });
            }
            _ => contents.push(Content::text(Some(role), &message.content)),
        }
    }
    contents
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Set model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different API host (mock servers, proxies)
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl ReplyProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &ReplyRequest) -> Result<String> {
        let contents = build_contents(&request.history);
        if contents.is_empty() {
            return Err(ReplyError::EmptyHistory);
        }

        let body = GenerateRequest {
            system_instruction: Content::text(None, &request.system_prompt()),
            contents,
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        tracing::debug!(model = %self.model, turns = body.contents.len(), "calling gemini");
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(ReplyError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .find_map(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join(""))
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ReplyError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_contents_alternates() {
        let history = vec![
            Message::assistant("welcome!"),
            Message::user("hi"),
            Message::user("are you there?"),
            Message::assistant("yes"),
            Message::user("cool"),
        ];
        let contents = build_contents(&history);
        let roles: Vec<_> = contents.iter().map(|c| c.role.as_deref().unwrap()).collect();
        assert_eq!(roles, ["user", "model", "user"]);
        assert_eq!(contents[0].parts.len(), 2);
        assert_eq!(contents[0].parts[1].text, "are you there?");
    }

    #[test]
    fn test_build_contents_without_user_is_empty() {
        assert!(build_contents(&[Message::assistant("hello")]).is_empty());
        assert!(build_contents(&[]).is_empty());
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new("k").api_base("http://localhost:9000/").model("gemini-pro");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(client.model_name(), "gemini-pro");
    }

    #[test]
    fn test_request_wire_format() {
        let body = GenerateRequest {
            system_instruction: Content::text(None, "be nice"),
            contents: build_contents(&[Message::user("hi")]),
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 64,
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["systemInstruction"]["parts"][0]["text"], "be nice");
        assert!(v["systemInstruction"].get("role").is_none());
        assert_eq!(v["contents"][0]["role"], "user");
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 64);
    }
}
