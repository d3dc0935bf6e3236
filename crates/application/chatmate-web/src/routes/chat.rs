//! Legacy one-shot chat -- `POST /api/chat`
//!
//! Serves the old `/chat` page. Nothing is stored; the caller sends the
//! thread it wants answered and gets a single reply back.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::post;
use axum::Router;
use chatmate_core::{Message, Personality, Role};
use chatmate_gemini::{Reply, ReplyRequest};
use serde::Deserialize;

use crate::error::{json_body, ApiError, ApiResult};
use crate::AppState;

const LEGACY_NAME: &str = "Chatmate";

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(one_shot))
}

#[derive(Deserialize)]
struct LegacyTurn {
    role: Role,
    content: String,
}

#[derive(Deserialize)]
struct LegacyRequest {
    message: Option<String>,
    personality: Option<Personality>,
    #[serde(default)]
    history: Vec<LegacyTurn>,
}

async fn one_shot(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LegacyRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let body = json_body(payload)?;
    let message = body
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("message is required"))?;

    let mut history: Vec<Message> = body
        .history
        .into_iter()
        .filter(|turn| !turn.content.trim().is_empty())
        .map(|turn| Message::new(turn.role, turn.content))
        .collect();
    history.push(Message::user(message));

    let personality = body.personality.unwrap_or(Personality::Friendly);
    let request = ReplyRequest::new(LEGACY_NAME, personality, history);
    let reply: Reply = state.replies.reply(&request).await;
    Ok(Json(reply))
}
