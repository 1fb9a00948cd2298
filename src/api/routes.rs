//! API route configuration.

use crate::api::handlers::{delete_handler, health_handler, redirect_handler, save_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All service routes.
///
/// # Endpoints
///
/// - `POST   /url`           - Store a URL under a caller-chosen or generated alias
/// - `DELETE /url/{alias}`   - Delete an alias
/// - `GET    /health`        - Store connectivity check
/// - `GET    /{alias}`       - Redirect to the stored target
///
/// Static segments take priority over `/{alias}`, which is why `url` and
/// `health` are reserved aliases.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(save_handler))
        .route("/url/{alias}", delete(delete_handler))
        .route("/health", get(health_handler))
        .route("/{alias}", get(redirect_handler))
}
