//! Application state shared by every handler

use chatmate_config::Config;
use chatmate_core::CredentialState;
use chatmate_gemini::ReplyEngine;
use chatmate_store::Store;

/// Shared application state
pub struct AppState {
    pub config: Config,
    /// JSON records under the data directory
    pub store: Store,
    /// Gemini or canned replies; carries the credential evaluated at startup
    pub replies: ReplyEngine,
}

impl AppState {
    /// Open the data directory and build the Gemini engine from config.
    pub async fn new(config: Config) -> chatmate_store::Result<Self> {
        let credential = config.credential();
        let replies = ReplyEngine::gemini(credential, &config.gemini_model, &config.gemini_api_base);
        Self::with_engine(config, replies).await
    }

    /// Same as [`AppState::new`] with a caller-supplied reply engine.
    pub async fn with_engine(config: Config, replies: ReplyEngine) -> chatmate_store::Result<Self> {
        let store = Store::open(&config.data_dir).await?;
        Ok(Self {
            config,
            store,
            replies,
        })
    }

    pub fn credential(&self) -> &CredentialState {
        self.replies.credential()
    }
}
