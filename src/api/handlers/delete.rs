//! Handler for alias deletion.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::save::StatusResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Permanently deletes an alias and its target.
///
/// # Endpoint
///
/// `DELETE /url/{alias}`
///
/// # Errors
///
/// Returns 404 Not Found if the alias doesn't exist.
pub async fn delete_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    state.alias_service.remove(&alias).await?;

    Ok(Json(StatusResponse::ok()))
}
