//! Helper functions used across the application:
//!
//! - [`alias_generator`] - Random alias generation and custom alias validation
//! - [`target_url`] - Target URL well-formedness checks
//! - [`db_error`] - Classification of SQLx errors

pub mod alias_generator;
pub mod db_error;
pub mod target_url;
