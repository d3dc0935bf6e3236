//! # Chatmate Web
//!
//! JSON API for contacts and chats, AI replies, and the static surfaces:
//!
//! - `/api/contacts`, `/api/chats`, `/api/chat` (legacy), `/api/health`;
//!   anything else under `/api` is a JSON 404
//! - `/uploads/*` from `<data>/uploads`
//! - production only: the built client bundle, with unknown paths falling
//!   back to `index.html` so client-side routes survive a reload

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", routes::api_router())
        .nest_service("/uploads", ServeDir::new(state.store.uploads_dir()));

    if state.config.is_production() {
        let dist = &state.config.client_dist;
        let spa = ServeDir::new(dist).fallback(ServeFile::new(dist.join("index.html")));
        app = app.fallback_service(spa);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on an already bound listener until the process stops.
pub async fn serve(listener: tokio::net::TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let app = create_router(state);
    axum::serve(listener, app).await
}
