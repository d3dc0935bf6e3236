pub mod chat;
pub mod chats;
pub mod contacts;
pub mod health;

use std::sync::Arc;

use axum::extract::OriginalUri;
use axum::Router;

use crate::{ApiError, AppState};

/// Every route group, relative to the `/api` prefix. Unknown paths under the
/// prefix answer with a JSON 404 rather than reaching the client bundle.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(contacts::router())
        .merge(chats::router())
        .merge(chat::router())
        .merge(health::router())
        .fallback(api_not_found)
}

async fn api_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("no endpoint at {}", uri.path()))
}
