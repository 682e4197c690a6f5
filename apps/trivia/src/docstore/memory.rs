//! In-process document store.
//!
//! Holds the whole tree behind one `RwLock`; change notifications fan out
//! through a per-path broadcast channel kept in a `DashMap` registry. A write
//! publishes its change while still holding the write lock, so subscribers
//! observe changes to one path in version order.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::{debug, trace};
use ulid::Generator;

use crate::docstore::{DocChange, DocPath, DocumentStore, Subscription, Versioned, ABSENT};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

pub struct InMemoryStore {
    docs: RwLock<BTreeMap<DocPath, Versioned<Value>>>,
    watchers: DashMap<DocPath, broadcast::Sender<DocChange>>,
    keys: Mutex<Generator>,
    online: AtomicBool,
    channel_capacity: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_channel_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Smaller capacities make slow subscribers skip ahead sooner.
    pub fn with_channel_capacity(channel_capacity: usize) -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
            watchers: DashMap::new(),
            keys: Mutex::new(Generator::new()),
            online: AtomicBool::new(true),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Simulate losing (or regaining) connectivity. While offline every
    /// operation fails with `Infra(Unavailable)` and nothing is written.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        debug!(online, "In-memory store connectivity changed");
    }

    /// Number of live subscribers on `path`.
    pub fn subscriber_count(&self, path: &DocPath) -> usize {
        self.watchers
            .get(path)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn ensure_online(&self) -> Result<(), DomainError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DomainError::infra(
                InfraErrorKind::Unavailable,
                "document store is offline",
            ))
        }
    }

    /// Store `value` at `path` and notify watchers. Caller holds the write lock.
    fn write_locked(
        &self,
        docs: &mut BTreeMap<DocPath, Versioned<Value>>,
        path: &DocPath,
        value: Value,
    ) -> u64 {
        let version = docs.get(path).map(|d| d.version).unwrap_or(ABSENT) + 1;
        docs.insert(
            path.clone(),
            Versioned {
                version,
                value: value.clone(),
            },
        );
        trace!(%path, version, "Document written");
        self.notify(path, version, Some(value));
        version
    }

    fn notify(&self, path: &DocPath, version: u64, value: Option<Value>) {
        let mut orphaned = false;
        if let Some(tx) = self.watchers.get(path) {
            let change = DocChange {
                path: path.clone(),
                version,
                value,
            };
            orphaned = tx.send(change).is_err();
        }
        if orphaned {
            self.watchers
                .remove_if(path, |_, tx| tx.receiver_count() == 0);
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Versioned<Value>>, DomainError> {
        self.ensure_online()?;
        Ok(self.docs.read().get(path).cloned())
    }

    async fn set(&self, path: &DocPath, value: Value) -> Result<u64, DomainError> {
        self.ensure_online()?;
        let mut docs = self.docs.write();
        Ok(self.write_locked(&mut docs, path, value))
    }

    async fn update(
        &self,
        path: &DocPath,
        fields: Map<String, Value>,
    ) -> Result<u64, DomainError> {
        self.ensure_online()?;
        let mut docs = self.docs.write();
        let merged = match docs.get(path).map(|d| &d.value) {
            Some(Value::Object(existing)) => {
                let mut merged = existing.clone();
                merged.extend(fields);
                merged
            }
            _ => fields,
        };
        Ok(self.write_locked(&mut docs, path, Value::Object(merged)))
    }

    async fn compare_and_set(
        &self,
        path: &DocPath,
        expected_version: u64,
        value: Value,
    ) -> Result<u64, DomainError> {
        self.ensure_online()?;
        let mut docs = self.docs.write();
        let current = docs.get(path).map(|d| d.version).unwrap_or(ABSENT);
        if current != expected_version {
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "{path} was modified concurrently (expected version {expected_version}, actual version {current})"
                ),
            ));
        }
        Ok(self.write_locked(&mut docs, path, value))
    }

    async fn list(
        &self,
        parent: &DocPath,
    ) -> Result<Vec<(String, Versioned<Value>)>, DomainError> {
        self.ensure_online()?;
        let docs = self.docs.read();
        Ok(docs
            .range(parent.clone()..)
            .take_while(|(path, _)| path.starts_with(parent))
            .filter(|(path, _)| path.is_child_of(parent))
            .map(|(path, doc)| (path.key().to_string(), doc.clone()))
            .collect())
    }

    fn generate_key(&self) -> String {
        let mut keys = self.keys.lock();
        // The generator only errors when the random part overflows within a
        // single millisecond; a fresh ULID is still unique in that case.
        keys.generate()
            .unwrap_or_else(|_| ulid::Ulid::new())
            .to_string()
    }

    fn subscribe(&self, path: &DocPath) -> Result<Subscription, DomainError> {
        self.ensure_online()?;
        // Holding the read lock keeps writers out between the snapshot and
        // the receiver registration.
        let docs = self.docs.read();
        let rx = self
            .watchers
            .entry(path.clone())
            .or_insert_with(|| broadcast::channel(self.channel_capacity).0)
            .subscribe();
        let initial = match docs.get(path) {
            Some(doc) => DocChange {
                path: path.clone(),
                version: doc.version,
                value: Some(doc.value.clone()),
            },
            None => DocChange {
                path: path.clone(),
                version: ABSENT,
                value: None,
            },
        };
        debug!(%path, "Subscription registered");
        Ok(Subscription::new(initial, rx))
    }
}
