//! Boolean marker documents (`true` = set) claimed with compare-and-set.

use serde_json::Value;

use crate::docstore::{DocPath, DocumentStore, Versioned, ABSENT};
use crate::errors::domain::DomainError;

pub async fn is_set(store: &dyn DocumentStore, path: &DocPath) -> Result<bool, DomainError> {
    let doc = store.get(path).await?;
    Ok(matches!(doc, Some(Versioned { value: Value::Bool(true), .. })))
}

/// Set the flag unless it is already set.
///
/// Returns the version written, or `None` when the flag was already set.
/// Losing a race to another claimer surfaces as an optimistic-lock conflict;
/// re-running the claim then observes the flag as set.
pub async fn claim(store: &dyn DocumentStore, path: &DocPath) -> Result<Option<u64>, DomainError> {
    let expected = match store.get(path).await? {
        Some(Versioned { value: Value::Bool(true), .. }) => return Ok(None),
        Some(doc) => doc.version,
        None => ABSENT,
    };
    store
        .compare_and_set(path, expected, Value::Bool(true))
        .await
        .map(Some)
}

/// Undo a claim written at `version`. A flag that moved since is left alone.
pub async fn release(
    store: &dyn DocumentStore,
    path: &DocPath,
    version: u64,
) -> Result<(), DomainError> {
    match store.compare_and_set(path, version, Value::Bool(false)).await {
        Ok(_) => Ok(()),
        Err(e) if e.is_optimistic_lock() => Ok(()),
        Err(e) => Err(e),
    }
}
