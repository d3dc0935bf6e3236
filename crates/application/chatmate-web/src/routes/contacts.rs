//! Contacts API -- `/api/contacts`

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use chatmate_core::{ContactPatch, NewContact};

use crate::error::{json_body, ApiResult};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/contacts", get(list_contacts).post(create_contact))
        .route(
            "/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .route("/contacts/{id}/chats", get(contact_chats))
}

async fn list_contacts(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let contacts = state.store.list_contacts().await?;
    Ok(Json(contacts))
}

async fn create_contact(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewContact>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let input = json_body(payload)?;
    let contact = state.store.create_contact(input).await?;
    tracing::info!(id = %contact.id, personality = %contact.personality, "contact created");
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn get_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.get_contact(&id).await?))
}

async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ContactPatch>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let patch = json_body(payload)?;
    Ok(Json(state.store.update_contact(&id, patch).await?))
}

async fn delete_contact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.store.delete_contact(&id).await?;
    tracing::info!(id = %deleted.id, chats = deleted.chats_deleted, "contact deleted");
    Ok(Json(deleted))
}

async fn contact_chats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.list_chats(Some(&id)).await?))
}
