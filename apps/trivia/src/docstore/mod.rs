//! Path-addressed document store abstraction.
//!
//! Documents are JSON values addressed by [`DocPath`]. Every document carries a
//! store-assigned version that increases on each write, which is what
//! [`DocumentStore::compare_and_set`] checks against.

pub mod memory;
pub mod path;
pub mod subscription;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::errors::domain::DomainError;

pub use memory::InMemoryStore;
pub use path::DocPath;
pub use subscription::{DocChange, Subscription};

/// Version passed to `compare_and_set` to require that the document is absent.
pub const ABSENT: u64 = 0;

/// A document together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocPath) -> Result<Option<Versioned<Value>>, DomainError>;

    /// Overwrite unconditionally. Returns the new version.
    async fn set(&self, path: &DocPath, value: Value) -> Result<u64, DomainError>;

    /// Merge top-level `fields` into the document, creating it if absent.
    async fn update(&self, path: &DocPath, fields: Map<String, Value>)
        -> Result<u64, DomainError>;

    /// Write only if the stored version still equals `expected_version`
    /// ([`ABSENT`] for "must not exist"). Fails with an optimistic-lock
    /// conflict otherwise.
    async fn compare_and_set(
        &self,
        path: &DocPath,
        expected_version: u64,
        value: Value,
    ) -> Result<u64, DomainError>;

    /// Direct children of `parent`, in key order.
    async fn list(&self, parent: &DocPath) -> Result<Vec<(String, Versioned<Value>)>, DomainError>;

    /// Fresh, time-ordered key for a new child document.
    fn generate_key(&self) -> String;

    /// Register a change listener on `path`. The first item is the current
    /// value; later items follow writes. Dropping the subscription cancels it.
    fn subscribe(&self, path: &DocPath) -> Result<Subscription, DomainError>;

    /// Append `value` under `parent` with a generated key. Returns the key.
    async fn push(&self, parent: &DocPath, value: Value) -> Result<String, DomainError> {
        let key = self.generate_key();
        self.compare_and_set(&parent.child(&key)?, ABSENT, value)
            .await?;
        Ok(key)
    }
}
