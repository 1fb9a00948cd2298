//! Alias resolution, lookup and removal service.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::alias_generator::{
    AliasGenerator, DEFAULT_ALIAS_LENGTH, RandomAliasGenerator, validate_custom_alias,
};
use crate::utils::target_url::check_target_url;

/// Default number of generate-and-save rounds before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Generation policy for aliases the caller did not choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasPolicy {
    /// Length of generated aliases.
    pub length: usize,
    /// Rounds of generate, pre-check and save before a conflict is surfaced.
    pub max_attempts: usize,
}

impl AliasPolicy {
    /// Both values are raised to at least 1.
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self {
            length: length.max(1),
            max_attempts: max_attempts.max(1),
        }
    }
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALIAS_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedAlias {
    pub id: i64,
    pub alias: String,
}

impl From<UrlRecord> for SavedAlias {
    fn from(record: UrlRecord) -> Self {
        Self {
            id: record.id,
            alias: record.alias,
        }
    }
}

/// Service that turns save requests into records with a unique alias.
///
/// Uniqueness is ultimately enforced by the store: the `alias_exists`
/// pre-check only filters out obvious collisions, and a conflict reported by
/// `save` triggers another generation round.
///
/// Log output is emitted under the `span` handed in at construction.
pub struct AliasService<R: UrlRepository + ?Sized, G: AliasGenerator = RandomAliasGenerator> {
    repository: Arc<R>,
    generator: G,
    policy: AliasPolicy,
    span: Span,
}

impl<R: UrlRepository + ?Sized, G: AliasGenerator> AliasService<R, G> {
    /// Creates a new alias service.
    pub fn new(repository: Arc<R>, generator: G, policy: AliasPolicy, span: Span) -> Self {
        Self {
            repository,
            generator,
            policy,
            span,
        }
    }

    pub fn policy(&self) -> AliasPolicy {
        self.policy
    }

    /// Persists `target_url` under a unique alias.
    ///
    /// A non-empty `alias` is used as-is; otherwise one is generated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the target URL is empty or malformed,
    /// or if the caller-supplied alias is invalid. The store is not touched.
    ///
    /// Returns [`AppError::AliasConflict`] if the caller-supplied alias is taken
    /// (no replacement is generated), or if every generation round collided.
    ///
    /// Returns [`AppError::Backend`] on store failures.
    pub async fn save(&self, target_url: &str, alias: Option<&str>) -> Result<SavedAlias, AppError> {
        let requested = alias.filter(|a| !a.is_empty());
        let span = info_span!(parent: &self.span, "save", requested_alias = requested);

        async move {
            check_target_url(target_url).map_err(|e| {
                AppError::validation("Invalid URL", json!({ "reason": e.to_string() }))
            })?;

            match requested {
                Some(custom) => self.save_custom(target_url, custom).await,
                None => self.save_generated(target_url).await,
            }
        }
        .instrument(span)
        .await
    }

    /// Returns the target URL stored under `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty alias.
    /// Returns [`AppError::NotFound`] if no record has that alias.
    /// Returns [`AppError::Backend`] on store failures.
    pub async fn resolve(&self, alias: &str) -> Result<String, AppError> {
        let span = info_span!(parent: &self.span, "resolve", alias);

        async move {
            ensure_alias_present(alias)?;
            let record = self.repository.get(alias).await?;
            debug!(target_url = %record.target_url, "Alias resolved");
            Ok(record.target_url)
        }
        .instrument(span)
        .await
    }

    /// Permanently deletes the record for `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty alias.
    /// Returns [`AppError::NotFound`] if no record has that alias.
    /// Returns [`AppError::Backend`] on store failures.
    pub async fn remove(&self, alias: &str) -> Result<(), AppError> {
        let span = info_span!(parent: &self.span, "remove", alias);

        async move {
            ensure_alias_present(alias)?;
            let record = self.repository.delete(alias).await?;
            info!(id = record.id, "Alias removed");
            Ok(())
        }
        .instrument(span)
        .await
    }

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Backend`] if the store cannot serve queries.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    async fn save_custom(&self, target_url: &str, alias: &str) -> Result<SavedAlias, AppError> {
        validate_custom_alias(alias)?;

        let record = self
            .repository
            .save(NewUrlRecord::new(alias, target_url))
            .await?;

        counter!("aliases_created_total", "source" => "custom").increment(1);
        info!(id = record.id, alias = %record.alias, "URL saved with caller alias");
        Ok(record.into())
    }

    async fn save_generated(&self, target_url: &str) -> Result<SavedAlias, AppError> {
        let mut last_candidate = String::new();

        for attempt in 1..=self.policy.max_attempts {
            let candidate = self.generator.generate(self.policy.length);

            if self.repository.alias_exists(&candidate).await? {
                counter!("alias_collisions_total", "stage" => "precheck").increment(1);
                warn!(attempt, alias = %candidate, "Generated alias already taken");
                last_candidate = candidate;
                continue;
            }

            match self
                .repository
                .save(NewUrlRecord::new(&candidate, target_url))
                .await
            {
                Ok(record) => {
                    counter!("aliases_created_total", "source" => "generated").increment(1);
                    info!(id = record.id, alias = %record.alias, attempt, "URL saved with generated alias");
                    return Ok(record.into());
                }
                Err(AppError::AliasConflict { .. }) => {
                    counter!("alias_collisions_total", "stage" => "insert").increment(1);
                    warn!(attempt, alias = %candidate, "Generated alias lost an insert race");
                    last_candidate = candidate;
                }
                Err(err) => return Err(err),
            }
        }

        warn!(
            attempts = self.policy.max_attempts,
            "Exhausted alias generation attempts"
        );
        Err(AppError::alias_conflict("alias_service.save", last_candidate))
    }
}

fn ensure_alias_present(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() {
        return Err(AppError::validation("Alias is empty", json!({})));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use crate::error::ErrorKind;
    use crate::infrastructure::persistence::InMemoryUrlRepository;
    use crate::utils::alias_generator::MockAliasGenerator;
    use chrono::Utc;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn record(id: i64, alias: &str, url: &str) -> UrlRecord {
        UrlRecord::new(id, alias.to_string(), url.to_string(), Utc::now())
    }

    fn scripted_generator(candidates: &[&str]) -> MockAliasGenerator {
        let mut generator = MockAliasGenerator::new();
        let mut seq = Sequence::new();
        for candidate in candidates {
            generator
                .expect_generate()
                .with(eq(DEFAULT_ALIAS_LENGTH))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(candidate.to_string());
        }
        generator
    }

    fn service<R: UrlRepository>(
        repo: R,
        generator: MockAliasGenerator,
    ) -> AliasService<R, MockAliasGenerator> {
        AliasService::new(
            Arc::new(repo),
            generator,
            AliasPolicy::default(),
            Span::none(),
        )
    }

    #[tokio::test]
    async fn test_save_with_custom_alias() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists().times(0);
        repo.expect_save()
            .withf(|new| new.alias == "promo" && new.target_url == "https://a.com")
            .times(1)
            .returning(|new| Ok(record(7, &new.alias, &new.target_url)));

        let saved = service(repo, MockAliasGenerator::new())
            .save("https://a.com", Some("promo"))
            .await
            .unwrap();

        assert_eq!(saved, SavedAlias { id: 7, alias: "promo".to_string() });
    }

    #[tokio::test]
    async fn test_save_custom_alias_conflict_is_not_replaced() {
        let mut repo = MockUrlRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|new| Err(AppError::alias_conflict("store.save", new.alias)));

        let mut generator = MockAliasGenerator::new();
        generator.expect_generate().times(0);

        let err = service(repo, generator)
            .save("https://b.com", Some("promo"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AliasConflict);
    }

    #[tokio::test]
    async fn test_save_invalid_custom_alias() {
        let mut repo = MockUrlRepository::new();
        repo.expect_save().times(0);

        let err = service(repo, MockAliasGenerator::new())
            .save("https://a.com", Some("has space"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn test_save_empty_target_never_reaches_store() {
        let mut repo = MockUrlRepository::new();
        repo.expect_save().times(0);
        repo.expect_alias_exists().times(0);

        let mut generator = MockAliasGenerator::new();
        generator.expect_generate().times(0);

        let svc = service(repo, generator);

        for target in ["", "   "] {
            let err = svc.save(target, None).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        }
    }

    #[tokio::test]
    async fn test_save_malformed_target() {
        let mut repo = MockUrlRepository::new();
        repo.expect_save().times(0);

        let err = service(repo, MockAliasGenerator::new())
            .save("javascript:alert(1)", Some("promo"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn test_save_generates_alias_when_missing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists()
            .with(eq("Ab3xY9"))
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_save()
            .withf(|new| new.alias == "Ab3xY9")
            .times(1)
            .returning(|new| Ok(record(1, &new.alias, &new.target_url)));

        let saved = service(repo, scripted_generator(&["Ab3xY9"]))
            .save("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(saved.alias, "Ab3xY9");
    }

    #[tokio::test]
    async fn test_save_empty_alias_is_treated_as_missing() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists().returning(|_| Ok(false));
        repo.expect_save()
            .times(1)
            .returning(|new| Ok(record(1, &new.alias, &new.target_url)));

        let saved = service(repo, scripted_generator(&["qwerty"]))
            .save("https://example.com", Some(""))
            .await
            .unwrap();

        assert_eq!(saved.alias, "qwerty");
    }

    #[tokio::test]
    async fn test_save_precheck_hit_generates_new_candidate() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists()
            .with(eq("taken1"))
            .times(1)
            .returning(|_| Ok(true));
        repo.expect_alias_exists()
            .with(eq("fresh1"))
            .times(1)
            .returning(|_| Ok(false));
        repo.expect_save()
            .withf(|new| new.alias == "fresh1")
            .times(1)
            .returning(|new| Ok(record(2, &new.alias, &new.target_url)));

        let saved = service(repo, scripted_generator(&["taken1", "fresh1"]))
            .save("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(saved.alias, "fresh1");
    }

    #[tokio::test]
    async fn test_save_retries_after_insert_conflict() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists().returning(|_| Ok(false));
        repo.expect_save()
            .withf(|new| new.alias == "raced1")
            .times(1)
            .returning(|new| Err(AppError::alias_conflict("store.save", new.alias)));
        repo.expect_save()
            .withf(|new| new.alias == "fresh2")
            .times(1)
            .returning(|new| Ok(record(3, &new.alias, &new.target_url)));

        let saved = service(repo, scripted_generator(&["raced1", "fresh2"]))
            .save("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(saved.alias, "fresh2");
    }

    #[tokio::test]
    async fn test_save_surfaces_conflict_after_max_attempts() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists()
            .times(DEFAULT_MAX_ATTEMPTS)
            .returning(|_| Ok(true));
        repo.expect_save().times(0);

        let candidates = ["c1", "c2", "c3", "c4", "c5"];
        let err = service(repo, scripted_generator(&candidates))
            .save("https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::AliasConflict { ref alias, .. } if alias == "c5"
        ));
    }

    #[tokio::test]
    async fn test_save_backend_error_is_not_retried() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists().times(1).returning(|_| Ok(false));
        repo.expect_save()
            .times(1)
            .returning(|new| Err(AppError::backend("store.save", Some(new.alias.as_str()), "disk full")));

        let err = service(repo, scripted_generator(&["abcdef"]))
            .save("https://example.com", None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_save_precheck_backend_error() {
        let mut repo = MockUrlRepository::new();
        repo.expect_alias_exists()
            .times(1)
            .returning(|alias| Err(AppError::backend("store.alias_exists", Some(alias), "down")));
        repo.expect_save().times(0);

        let err = service(repo, scripted_generator(&["abcdef"]))
            .save("https://example.com", None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_resolve_and_remove_pass_through_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get()
            .with(eq("missing"))
            .returning(|alias| Err(AppError::not_found("store.get", alias)));
        repo.expect_delete()
            .with(eq("missing"))
            .returning(|alias| Err(AppError::not_found("store.delete", alias)));

        let svc = service(repo, MockAliasGenerator::new());

        assert_eq!(svc.resolve("missing").await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(svc.remove("missing").await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_empty_alias() {
        let mut repo = MockUrlRepository::new();
        repo.expect_get().times(0);

        let err = service(repo, MockAliasGenerator::new())
            .resolve("")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn test_generated_alias_lifecycle() {
        let svc = AliasService::new(
            Arc::new(InMemoryUrlRepository::new()),
            RandomAliasGenerator,
            AliasPolicy::default(),
            Span::none(),
        );

        let saved = svc.save("https://example.com", Some("")).await.unwrap();
        assert_eq!(saved.alias.len(), 6);
        assert!(saved.alias.chars().all(|c| c.is_ascii_alphanumeric()));

        assert_eq!(svc.resolve(&saved.alias).await.unwrap(), "https://example.com");
        svc.remove(&saved.alias).await.unwrap();
        assert_eq!(
            svc.resolve(&saved.alias).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_two_generated_saves_produce_distinct_records() {
        let svc = AliasService::new(
            Arc::new(InMemoryUrlRepository::new()),
            RandomAliasGenerator,
            AliasPolicy::default(),
            Span::none(),
        );

        let first = svc.save("https://example.com", None).await.unwrap();
        let second = svc.save("https://example.com", None).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.alias, second.alias);
        assert_eq!(svc.resolve(&first.alias).await.unwrap(), "https://example.com");
        assert_eq!(svc.resolve(&second.alias).await.unwrap(), "https://example.com");
    }

    #[tokio::test]
    async fn test_explicit_alias_conflict_keeps_first_target() {
        let svc = AliasService::new(
            Arc::new(InMemoryUrlRepository::new()),
            RandomAliasGenerator,
            AliasPolicy::default(),
            Span::none(),
        );

        svc.save("https://a.com", Some("promo")).await.unwrap();
        let err = svc.save("https://b.com", Some("promo")).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AliasConflict);
        assert_eq!(svc.resolve("promo").await.unwrap(), "https://a.com");
    }

    #[test]
    fn test_policy_is_at_least_one() {
        assert_eq!(AliasPolicy::new(0, 0), AliasPolicy::new(1, 1));
        assert_eq!(AliasPolicy::default().length, 6);
    }
}
