//! HTTP transport for KeyBridge.
//!
//! Exposes the vault store over two endpoints:
//! - `GET /search`: field criteria via query parameters, entry as JSON
//! - `POST /reload`: vault password via form body, atomic store reload
//!
//! The transport owns the mapping from store errors to status codes; the
//! store itself knows nothing about HTTP.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

pub mod handlers;
pub mod response;
pub mod state;

pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/reload", post(handlers::reload))
        .with_state(state)
}
