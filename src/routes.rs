//! Top-level router configuration.
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` is assigned when missing and echoed back
//! - **Tracing** - Structured request/response logging
//! - **Timeout** - Per-request deadline, `408 Request Timeout` when exceeded
//! - **Path normalization** - Trailing slash handling

use std::time::Duration;

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use tower::{Layer, ServiceBuilder};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::timeout::TimeoutLayer;

/// Constructs the routed application with all middleware except path
/// normalization.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    api::routes::routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(tracing::set_request_id())
            .layer(tracing::propagate_request_id())
            .layer(tracing::layer())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            )),
    )
}

/// Constructs the application served by the listener.
///
/// Trailing slashes are trimmed before routing, so `/url/` reaches the save
/// handler.
pub fn app_router(state: AppState, request_timeout: Duration) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, request_timeout))
}
