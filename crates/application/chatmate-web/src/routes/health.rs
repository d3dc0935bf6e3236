use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

/// Liveness plus credential diagnostics. The key itself is never echoed.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let credential = state.credential();
    Json(serde_json::json!({
        "status": "ok",
        "message": "API is running",
        "hasGeminiKey": credential.is_valid(),
        "apiKeyLength": credential.length(),
        "encryptionStatus": "disabled",
        "keyFormat": credential.format(),
    }))
}
