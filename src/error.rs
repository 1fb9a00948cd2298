//! Error taxonomy shared by the store, the alias service and the HTTP layer.
//!
//! Every failure is an [`AppError`] tagged with an [`ErrorKind`]. The store
//! classifies backend-native errors into this taxonomy where they occur, so
//! callers above it only ever match on [`AppError`] variants.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// Boxed backend error kept as the source of [`AppError::Backend`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of an [`AppError`], used for programmatic matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AliasConflict,
    ValidationFailed,
    Backend,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: ErrorInfo,
}

/// Client-facing error description.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input rejected before any store interaction.
    #[error("validation failed: {message}")]
    Validation { message: String, details: Value },

    /// No record carries the alias.
    #[error("{op}: alias '{alias}' not found")]
    NotFound { op: &'static str, alias: String },

    /// The alias is already claimed by another record.
    #[error("{op}: alias '{alias}' is already in use")]
    AliasConflict { op: &'static str, alias: String },

    /// Any persistence failure that is neither not-found nor a conflict.
    #[error("{op}: backend failure")]
    Backend {
        op: &'static str,
        alias: Option<String>,
        #[source]
        source: BoxError,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(op: &'static str, alias: impl Into<String>) -> Self {
        Self::NotFound {
            op,
            alias: alias.into(),
        }
    }

    pub fn alias_conflict(op: &'static str, alias: impl Into<String>) -> Self {
        Self::AliasConflict {
            op,
            alias: alias.into(),
        }
    }

    pub fn backend(
        op: &'static str,
        alias: Option<&str>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Backend {
            op,
            alias: alias.map(str::to_owned),
            source: source.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationFailed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AliasConflict { .. } => ErrorKind::AliasConflict,
            Self::Backend { .. } => ErrorKind::Backend,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AliasConflict => StatusCode::CONFLICT,
            ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the client-facing description. Backend details are never exposed.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            Self::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            Self::NotFound { alias, .. } => ErrorInfo {
                code: "not_found",
                message: "Alias not found".to_string(),
                details: json!({ "alias": alias }),
            },
            Self::AliasConflict { alias, .. } => ErrorInfo {
                code: "alias_conflict",
                message: "Alias already in use".to_string(),
                details: json!({ "alias": alias }),
            },
            Self::Backend { .. } => ErrorInfo {
                code: "internal_error",
                message: "Internal error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Backend { op, alias, source } => {
                tracing::error!(op, alias = ?alias, error = %source, "Backend failure");
            }
            other => {
                tracing::info!(error = %other, "Request rejected");
            }
        }

        let body = ErrorBody {
            status: "error",
            error: self.to_error_info(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
                (field.to_string(), json!(codes))
            })
            .collect();

        Self::validation("Request validation failed", Value::Object(fields))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}
