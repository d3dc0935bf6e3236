//! Reply engine: provider when allowed, canned reply otherwise

use crate::fallback::fallback_reply;
use crate::provider::{ReplyProvider, ReplyRequest};
use crate::GeminiClient;
use chatmate_core::CredentialState;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Gemini,
    Fallback,
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub source: ReplySource,
}

impl Reply {
    fn fallback(request: &ReplyRequest) -> Self {
        Self {
            text: fallback_reply(&request.personality).to_string(),
            source: ReplySource::Fallback,
        }
    }
}

/// Shared by every request; cheap to clone.
#[derive(Clone)]
pub struct ReplyEngine {
    credential: CredentialState,
    provider: Option<Arc<dyn ReplyProvider>>,
}

impl ReplyEngine {
    /// Engine with an explicit provider. The provider is only consulted while
    /// the credential is valid.
    pub fn new(credential: CredentialState, provider: Arc<dyn ReplyProvider>) -> Self {
        Self {
            credential,
            provider: Some(provider),
        }
    }

    /// Engine that always answers from the canned replies.
    pub fn fallback_only(credential: CredentialState) -> Self {
        Self {
            credential,
            provider: None,
        }
    }

    /// Gemini-backed engine; degrades to fallback-only without a usable key.
    pub fn gemini(credential: CredentialState, model: &str, api_base: &str) -> Self {
        match credential.usable_key() {
            Some(key) => {
                let client = GeminiClient::new(key).model(model).api_base(api_base);
                Self::new(credential.clone(), Arc::new(client))
            }
            None => Self::fallback_only(credential),
        }
    }

    pub fn credential(&self) -> &CredentialState {
        &self.credential
    }

    /// True when replies will be attempted against the provider.
    pub fn ai_enabled(&self) -> bool {
        self.credential.is_valid() && self.provider.is_some()
    }

    /// Produce exactly one reply. Never fails.
    pub async fn reply(&self, request: &ReplyRequest) -> Reply {
        let provider = match (&self.provider, self.credential.is_valid()) {
            (Some(provider), true) => provider,
            _ => return Reply::fallback(request),
        };

        match provider.generate(request).await {
            Ok(text) => Reply {
                text,
                source: ReplySource::Gemini,
            },
            Err(e) => {
                tracing::warn!(provider = provider.name(), "reply generation failed, using fallback: {}", e);
                Reply::fallback(request)
            }
        }
    }
}

impl fmt::Debug for ReplyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplyEngine")
            .field("credential", &self.credential)
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}
