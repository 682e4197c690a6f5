//! Match repository functions.

use crate::docstore::{DocumentStore, Versioned, ABSENT};
use crate::domain::{Match, MatchId, MatchStatus};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{decode, encode, paths};

pub async fn find_match(
    store: &dyn DocumentStore,
    id: &MatchId,
) -> Result<Option<Versioned<Match>>, DomainError> {
    store
        .get(&paths::match_doc(id)?)
        .await?
        .map(decode)
        .transpose()
}

/// Find match by id or return a not-found error.
pub async fn require_match(
    store: &dyn DocumentStore,
    id: &MatchId,
) -> Result<Versioned<Match>, DomainError> {
    find_match(store, id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Match, format!("match {id}")))
}

/// Write a brand-new match. Fails if the id is already taken.
pub async fn insert_match(
    store: &dyn DocumentStore,
    record: &Match,
) -> Result<Versioned<Match>, DomainError> {
    let version = store
        .compare_and_set(&paths::match_doc(&record.id)?, ABSENT, encode(record)?)
        .await?;
    Ok(Versioned {
        version,
        value: record.clone(),
    })
}

/// Write `record` only if the stored match is still at `expected_version`.
pub async fn save_match(
    store: &dyn DocumentStore,
    expected_version: u64,
    record: &Match,
) -> Result<Versioned<Match>, DomainError> {
    let version = store
        .compare_and_set(&paths::match_doc(&record.id)?, expected_version, encode(record)?)
        .await?;
    Ok(Versioned {
        version,
        value: record.clone(),
    })
}

/// Waiting matches for `level`, oldest first.
pub async fn list_waiting(
    store: &dyn DocumentStore,
    level: u32,
) -> Result<Vec<Versioned<Match>>, DomainError> {
    let mut waiting = Vec::new();
    for (key, doc) in store.list(&paths::matches()?).await? {
        match decode::<Match>(doc) {
            Ok(m) if m.value.status == MatchStatus::Waiting && m.value.level_id == level => {
                waiting.push(m)
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(match_id = %key, error = %e, "Skipping undecodable match"),
        }
    }
    Ok(waiting)
}
