//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::alias_service::AliasService`] - Alias resolution on save, lookup and removal

pub mod services;
