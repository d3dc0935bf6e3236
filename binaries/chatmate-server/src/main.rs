//! Chatmate API server
//!
//! ## Usage
//!
//! ```bash
//! chatmate-server                          # 0.0.0.0:3001, ./data
//! PORT=8080 DATA_DIRECTORY=/srv/chatmate chatmate-server
//! NODE_ENV=production CLIENT_DIST=./dist chatmate-server
//! ```
//!
//! Settings come from the environment, optionally seeded by a `.env` file.

use std::sync::Arc;

use anyhow::Context;
use chatmate_config::{load_dotenv, Config, API_KEY_VAR};
use chatmate_web::{serve, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG can come from it
    let dotenv = load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatmate_server=info,chatmate_web=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = dotenv {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let config = Config::from_env().context("invalid configuration")?;
    config.validate().context("invalid configuration")?;
    log_diagnostics(&config);

    let state = AppState::new(config)
        .await
        .context("failed to open data directory")?;
    let addr = state.config.bind_addr();
    let ai_enabled = state.replies.ai_enabled();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to listen on {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Chatmate API listening on http://{}", addr);
    if ai_enabled {
        tracing::info!("AI replies enabled (Gemini)");
    } else {
        tracing::info!("Running in fallback mode: replies come from built-in personality responses");
        tracing::info!("To enable AI replies, set {} to a Gemini key from https://aistudio.google.com/app/apikey", API_KEY_VAR);
    }

    serve(listener, Arc::new(state)).await.context("server error")?;
    Ok(())
}

/// Startup summary. Never prints the key beyond a short prefix.
fn log_diagnostics(config: &Config) {
    let credential = config.credential();
    tracing::info!(
        mode = %config.mode,
        port = config.port,
        data_dir = %config.data_dir().display(),
        model = %config.gemini_model,
        "Starting Chatmate"
    );
    tracing::info!(
        present = credential.is_present(),
        length = credential.length(),
        preview = credential.preview().as_deref().unwrap_or("-"),
        format = %credential.format(),
        "{} status",
        API_KEY_VAR
    );
    if let Some(problem) = credential.problem() {
        tracing::warn!("{}: {}", API_KEY_VAR, problem);
    }
    if config.is_production() {
        tracing::info!(client_dist = %config.client_dist.display(), "Serving client bundle");
    }
}
