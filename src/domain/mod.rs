//! Domain layer: the URL record entity and the store contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer knows nothing about HTTP or SQL. Storage backends in
//! [`crate::infrastructure::persistence`] implement [`repositories::UrlRepository`]
//! and report failures as [`crate::error::AppError`] values.

pub mod entities;
pub mod repositories;
