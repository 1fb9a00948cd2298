//! DTOs for the save and delete endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::utils::alias_generator::MAX_CUSTOM_ALIAS_LENGTH_U64;

/// Compiled regex for caller-supplied aliases. Empty input means "generate one".
static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]*$").unwrap());

/// Request to store a URL under an alias.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveRequest {
    /// The target URL (must be a valid absolute URL).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional caller-chosen alias. Missing or empty means one is generated.
    #[validate(length(max = MAX_CUSTOM_ALIAS_LENGTH_U64))]
    #[validate(regex(path = "*ALIAS_REGEX", message = "Alias may only contain letters, digits, '_' and '-'"))]
    pub alias: Option<String>,
}

/// Successful save.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub status: &'static str,
    pub alias: String,
}

impl SaveResponse {
    pub fn ok(alias: String) -> Self {
        Self { status: "ok", alias }
    }
}

/// Bare success acknowledgement.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
