//! Canned replies used whenever Gemini is not called or fails
//!
//! The reply depends on the personality tag and nothing else: every turn
//! with the same tag gets the same text.

use chatmate_core::Personality;

const FRIENDLY: &str = "Hey! That's great to hear from you. Tell me more!";
const PROFESSIONAL: &str = "Thank you for the update. Could you share a bit more detail?";
const FUNNY: &str = "Okay, that made me laugh harder than it should have.";
const ROMANTIC: &str = "You always know how to make me smile.";
const SUPPORTIVE: &str = "That sounds like a lot. I'm here for you, take your time.";
const WISE: &str = "Every question carries the seed of its answer. What does your heart say?";
const SARCASTIC: &str = "Oh wow, groundbreaking. Go on, I'm riveted.";

/// The canned reply for a personality. Unknown tags answer like `friendly`.
pub fn fallback_reply(personality: &Personality) -> &'static str {
    match personality.effective() {
        Personality::Professional => PROFESSIONAL,
        Personality::Funny => FUNNY,
        Personality::Romantic => ROMANTIC,
        Personality::Supportive => SUPPORTIVE,
        Personality::Wise => WISE,
        Personality::Sarcastic => SARCASTIC,
        _ => FRIENDLY,
    }
}
