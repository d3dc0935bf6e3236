//! Chats API -- `/api/chats`
//!
//! A turn (`POST /api/chats/{id}/messages`) stores the user's message,
//! waits for one reply, stores that too and returns it. The store lock is
//! not held while the provider is working.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use chatmate_core::{Chat, Message};
use chatmate_gemini::{ReplyRequest, ReplySource};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{json_body, ApiError, ApiResult};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chats", get(list_chats).post(create_chat))
        .route("/chats/{id}", get(get_chat).delete(delete_chat))
        .route("/chats/{id}/messages", get(list_messages).post(send_message))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    contact_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody {
    contact_id: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct SendBody {
    #[serde(alias = "message", alias = "content")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnResponse {
    reply: String,
    source: ReplySource,
    chat_id: String,
    user_message: Message,
    assistant_message: Message,
}

async fn list_chats(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let contact_id = q.contact_id.as_deref().filter(|c| !c.is_empty());
    Ok(Json(state.store.list_chats(contact_id).await?))
}

async fn create_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let body = json_body(payload)?;
    let contact_id = body
        .contact_id
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("contactId is required"))?;

    let chat = state.store.create_chat(&contact_id, body.title).await?;
    Ok((StatusCode::CREATED, Json(chat)))
}

async fn get_chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Chat>> {
    Ok(Json(state.store.get_chat(&id).await?))
}

async fn list_messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.get_chat(&id).await?.messages))
}

async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.store.delete_chat(&id).await?;
    Ok(Json(json!({ "id": id, "deleted": true })))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<SendBody>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let text = json_body(payload)?
        .text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("text is required"))?;

    // `id` may name a chat or a contact whose chat is opened on first use.
    let chat = state.store.resolve_chat(&id).await?;
    let contact = state.store.get_contact(&chat.contact_id).await?;

    let user_message = state.store.append_message(&chat.id, Message::user(text)).await?;
    let history = state.store.get_chat(&chat.id).await?.messages;

    let request = ReplyRequest::new(contact.name, contact.personality, history);
    let reply = state.replies.reply(&request).await;
    tracing::debug!(chat_id = %chat.id, source = %reply.source, "reply ready");

    let assistant_message = state
        .store
        .append_message(&chat.id, Message::assistant(reply.text.clone()))
        .await?;

    Ok(Json(TurnResponse {
        reply: reply.text,
        source: reply.source,
        chat_id: chat.id,
        user_message,
        assistant_message,
    }))
}
