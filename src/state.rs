use std::sync::Arc;

use crate::application::services::{AliasPolicy, AliasService};
use crate::domain::repositories::UrlRepository;
use crate::utils::alias_generator::RandomAliasGenerator;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub alias_service: Arc<AliasService<dyn UrlRepository>>,
    /// Name of the active storage backend, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Wires the alias service on top of `store`.
    ///
    /// The service logs under an `alias_service` span tagged with `storage`.
    pub fn new(store: Arc<dyn UrlRepository>, storage: &'static str, policy: AliasPolicy) -> Self {
        let span = tracing::info_span!("alias_service", storage);
        let alias_service = AliasService::new(store, RandomAliasGenerator, policy, span);

        Self {
            alias_service: Arc::new(alias_service),
            storage,
        }
    }
}
