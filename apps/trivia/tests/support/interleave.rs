//! A store that yields to the scheduler before every call, so futures joined
//! on one task interleave between their reads and writes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use trivia::{
    AppState, DocPath, DocumentStore, DomainError, GameConfig, InMemoryStore, Subscription,
    Versioned,
};

pub struct YieldingStore {
    inner: Arc<InMemoryStore>,
}

impl YieldingStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Versioned<Value>>, DomainError> {
        tokio::task::yield_now().await;
        self.inner.get(path).await
    }

    async fn set(&self, path: &DocPath, value: Value) -> Result<u64, DomainError> {
        tokio::task::yield_now().await;
        self.inner.set(path, value).await
    }

    async fn update(
        &self,
        path: &DocPath,
        fields: Map<String, Value>,
    ) -> Result<u64, DomainError> {
        tokio::task::yield_now().await;
        self.inner.update(path, fields).await
    }

    async fn compare_and_set(
        &self,
        path: &DocPath,
        expected_version: u64,
        value: Value,
    ) -> Result<u64, DomainError> {
        tokio::task::yield_now().await;
        self.inner.compare_and_set(path, expected_version, value).await
    }

    async fn list(
        &self,
        parent: &DocPath,
    ) -> Result<Vec<(String, Versioned<Value>)>, DomainError> {
        tokio::task::yield_now().await;
        self.inner.list(parent).await
    }

    fn generate_key(&self) -> String {
        self.inner.generate_key()
    }

    fn subscribe(&self, path: &DocPath) -> Result<Subscription, DomainError> {
        self.inner.subscribe(path)
    }
}

/// Like `seed::app`, but services see the store through [`YieldingStore`].
/// Seed through the returned inner store.
pub fn interleaved_app(config: GameConfig) -> (Arc<InMemoryStore>, AppState) {
    let inner = Arc::new(InMemoryStore::new());
    let store = Arc::new(YieldingStore::new(inner.clone()));
    let state = AppState::new(config, store).expect("valid config");
    (inner, state)
}
