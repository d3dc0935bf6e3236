//! Provider seam
//!
//! The engine only knows this trait. Gemini is the one real implementation;
//! tests plug in their own.

use crate::Result;
use async_trait::async_trait;
use chatmate_core::{Message, Personality};

/// Everything a provider needs to answer a turn
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub contact_name: String,
    pub personality: Personality,
    /// Full thread, oldest first, ending with the user's latest message
    pub history: Vec<Message>,
}

impl ReplyRequest {
    pub fn new(contact_name: impl Into<String>, personality: Personality, history: Vec<Message>) -> Self {
        Self {
            contact_name: contact_name.into(),
            personality,
            history,
        }
    }

    /// Instruction that keeps the model in character.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {name}, a contact in a messaging app. Your personality is {tag}: {desc}. \
             Reply the way {name} would in a chat: short, natural, one message, no narration. \
             Never mention that you are an AI model.",
            name = self.contact_name,
            tag = self.personality.effective(),
            desc = self.personality.describe(),
        )
    }
}

#[async_trait]
pub trait ReplyProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &str;

    /// Generate one reply for the request's history.
    async fn generate(&self, request: &ReplyRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_mentions_character() {
        let req = ReplyRequest::new("Morgan", Personality::Other("pirate".into()), vec![]);
        let prompt = req.system_prompt();
        assert!(prompt.contains("Morgan"));
        assert!(prompt.contains("friendly"));
    }
}
