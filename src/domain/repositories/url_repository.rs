//! Store contract for alias to URL records.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable mapping from alias to target URL.
///
/// Implementations classify backend-native failures into [`AppError`] at the
/// point they occur. Successful mutations are durable before the call returns.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AliasConflict`] when the alias uniqueness constraint
    /// rejects the insert. The conflict comes from the backend itself, never
    /// from a prior lookup.
    ///
    /// Returns [`AppError::Backend`] on any other failure.
    async fn save(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Looks up the record for `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has that alias.
    /// Returns [`AppError::Backend`] on database errors.
    async fn get(&self, alias: &str) -> Result<UrlRecord, AppError>;

    /// Permanently removes the record for `alias` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has that alias.
    /// Returns [`AppError::Backend`] on database errors.
    async fn delete(&self, alias: &str) -> Result<UrlRecord, AppError>;

    /// Best-effort existence check.
    ///
    /// Racy under concurrent writers; only [`UrlRepository::save`] is
    /// authoritative about conflicts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Backend`] on database errors.
    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError>;

    /// Checks that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Backend`] if the backend cannot serve queries.
    async fn ping(&self) -> Result<(), AppError>;
}
