//! Alias generation and validation utilities.
//!
//! Generated aliases are drawn from the 62-symbol alphanumeric alphabet.
//! Uniqueness is not guaranteed here; collisions are resolved by
//! [`crate::application::services::AliasService`].

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of generated aliases unless configured otherwise.
pub const DEFAULT_ALIAS_LENGTH: usize = 6;

/// Longest alias a caller may choose.
pub const MAX_CUSTOM_ALIAS_LENGTH: usize = 64;

/// [`MAX_CUSTOM_ALIAS_LENGTH`] as the `u64` bound used by request validation.
pub const MAX_CUSTOM_ALIAS_LENGTH_U64: u64 = MAX_CUSTOM_ALIAS_LENGTH as u64;

/// Path segments used by the service's own routes.
const RESERVED_ALIASES: &[&str] = &["url", "health"];

/// Source of candidate aliases.
#[cfg_attr(test, mockall::automock)]
pub trait AliasGenerator: Send + Sync {
    /// Returns a candidate alias of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Generator backed by the thread-local RNG, seeded from OS entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAliasGenerator;

impl AliasGenerator for RandomAliasGenerator {
    fn generate(&self, length: usize) -> String {
        generate_alias(length)
    }
}

/// Generates a random alias of `length` characters from `[A-Za-z0-9]`.
///
/// Each character is sampled uniformly from the 62-symbol alphabet.
///
/// # Examples
///
/// ```ignore
/// let alias = generate_alias(6);
/// assert_eq!(alias.len(), 6);
/// assert!(alias.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_alias(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, `-` and `_`
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() || alias.len() > MAX_CUSTOM_ALIAS_LENGTH {
        return Err(AppError::validation(
            format!("Alias must be 1-{MAX_CUSTOM_ALIAS_LENGTH} characters"),
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !alias
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::validation(
            "Alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES.contains(&alias) {
        return Err(AppError::validation(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
