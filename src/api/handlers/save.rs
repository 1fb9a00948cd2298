//! Handler for the save endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::save::{SaveRequest, SaveResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Stores a target URL under a caller-chosen or generated alias.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "alias": "promo"   // optional, empty string means "generate"
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "alias": "promo" }
/// ```
///
/// # Errors
///
/// - 400 Bad Request for malformed JSON, an invalid URL or an invalid alias
/// - 409 Conflict if the requested alias is taken, or generation kept colliding
/// - 500 Internal Server Error on store failures
pub async fn save_handler(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let saved = state
        .alias_service
        .save(&payload.url, payload.alias.as_deref())
        .await?;

    Ok(Json(SaveResponse::ok(saved.alias)))
}
