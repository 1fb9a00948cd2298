//! Core domain entities.
//!
//! - [`UrlRecord`] - A persisted alias to target URL mapping
//! - [`NewUrlRecord`] - Input for creating a record (the store assigns `id`)

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
