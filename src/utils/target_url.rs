//! Target URL checks applied before anything is persisted.
//!
//! Targets are stored exactly as submitted; only well-formedness is checked,
//! never reachability.

use url::Url;

/// Reasons a target URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum TargetUrlError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacters,
}

/// Checks that `input` is a well-formed absolute HTTP(S) URL.
///
/// # Errors
///
/// Returns [`TargetUrlError::Empty`] for blank input,
/// [`TargetUrlError::InvalidFormat`] for unparsable input,
/// [`TargetUrlError::UnsupportedProtocol`] for non-HTTP(S) schemes such as
/// `javascript:` or `file:`, and [`TargetUrlError::MissingHost`] when no host is present.
/// Input containing control characters is rejected with
/// [`TargetUrlError::ControlCharacters`], since it is later sent verbatim in a
/// `Location` header.
pub fn check_target_url(input: &str) -> Result<(), TargetUrlError> {
    if input.trim().is_empty() {
        return Err(TargetUrlError::Empty);
    }

    if input.chars().any(char::is_control) {
        return Err(TargetUrlError::ControlCharacters);
    }

    let url = Url::parse(input).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetUrlError::MissingHost);
    }

    Ok(())
}
