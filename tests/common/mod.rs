#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;

use shortly::application::services::AliasPolicy;
use shortly::domain::entities::{NewUrlRecord, UrlRecord};
use shortly::domain::repositories::UrlRepository;
use shortly::error::AppError;
use shortly::infrastructure::persistence::InMemoryUrlRepository;
use shortly::routes::router;
use shortly::state::AppState;

pub fn create_test_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryUrlRepository::new()),
        "memory",
        AliasPolicy::default(),
    )
}

pub fn create_test_server(state: AppState) -> TestServer {
    create_test_server_with_timeout(state, Duration::from_secs(5))
}

pub fn create_test_server_with_timeout(state: AppState, request_timeout: Duration) -> TestServer {
    TestServer::new(router(state, request_timeout)).unwrap()
}

/// Store whose every call fails as if the database were down.
pub struct UnavailableRepository;

fn down(op: &'static str, alias: Option<&str>) -> AppError {
    AppError::backend(op, alias, "connection refused")
}

#[async_trait]
impl UrlRepository for UnavailableRepository {
    async fn save(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        Err(down("store.save", Some(new_record.alias.as_str())))
    }

    async fn get(&self, alias: &str) -> Result<UrlRecord, AppError> {
        Err(down("store.get", Some(alias)))
    }

    async fn delete(&self, alias: &str) -> Result<UrlRecord, AppError> {
        Err(down("store.delete", Some(alias)))
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        Err(down("store.alias_exists", Some(alias)))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(down("store.ping", None))
    }
}

pub fn create_unavailable_state() -> AppState {
    AppState::new(
        Arc::new(UnavailableRepository),
        "postgres",
        AliasPolicy::default(),
    )
}

/// In-memory store whose `ping` stalls long enough to trip a short request timeout.
pub struct StallingRepository {
    inner: InMemoryUrlRepository,
    delay: Duration,
}

#[async_trait]
impl UrlRepository for StallingRepository {
    async fn save(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        self.inner.save(new_record).await
    }

    async fn get(&self, alias: &str) -> Result<UrlRecord, AppError> {
        self.inner.get(alias).await
    }

    async fn delete(&self, alias: &str) -> Result<UrlRecord, AppError> {
        self.inner.delete(alias).await
    }

    async fn alias_exists(&self, alias: &str) -> Result<bool, AppError> {
        self.inner.alias_exists(alias).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        tokio::time::sleep(self.delay).await;
        self.inner.ping().await
    }
}

pub fn create_stalling_state(delay: Duration) -> AppState {
    AppState::new(
        Arc::new(StallingRepository {
            inner: InMemoryUrlRepository::new(),
            delay,
        }),
        "memory",
        AliasPolicy::default(),
    )
}
