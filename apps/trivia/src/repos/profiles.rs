//! User profile, level-completion and retry-marker repository functions.

use serde_json::Value;

use crate::docstore::{DocumentStore, Versioned, ABSENT};
use crate::domain::{LevelId, UserProfile};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{decode, encode, flags, paths};

pub async fn find_profile(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Option<Versioned<UserProfile>>, DomainError> {
    store
        .get(&paths::profile(user_id)?)
        .await?
        .map(decode)
        .transpose()
}

pub async fn require_profile(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Versioned<UserProfile>, DomainError> {
    find_profile(store, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, format!("user {user_id}")))
}

/// Create the profile document; conflicts if one already exists.
pub async fn create_profile(
    store: &dyn DocumentStore,
    profile: &UserProfile,
) -> Result<Versioned<UserProfile>, DomainError> {
    save_profile(store, ABSENT, profile).await
}

pub async fn save_profile(
    store: &dyn DocumentStore,
    expected_version: u64,
    profile: &UserProfile,
) -> Result<Versioned<UserProfile>, DomainError> {
    let version = store
        .compare_and_set(
            &paths::profile(&profile.user_id)?,
            expected_version,
            encode(profile)?,
        )
        .await?;
    Ok(Versioned {
        version,
        value: profile.clone(),
    })
}

pub async fn is_level_completed(
    store: &dyn DocumentStore,
    user_id: &str,
    level: LevelId,
) -> Result<bool, DomainError> {
    flags::is_set(store, &paths::completed_level(user_id, level)?).await
}

/// Idempotent: marking an already-completed level again is a no-op write.
pub async fn mark_level_completed(
    store: &dyn DocumentStore,
    user_id: &str,
    level: LevelId,
) -> Result<(), DomainError> {
    store
        .set(&paths::completed_level(user_id, level)?, Value::Bool(true))
        .await?;
    Ok(())
}

/// Record the paid retry of one level attempt. `None` when that attempt has
/// already retried.
pub async fn claim_retry(
    store: &dyn DocumentStore,
    user_id: &str,
    level: LevelId,
    attempt_id: &str,
) -> Result<Option<u64>, DomainError> {
    flags::claim(store, &paths::retry_marker(user_id, level, attempt_id)?).await
}

pub async fn release_retry(
    store: &dyn DocumentStore,
    user_id: &str,
    level: LevelId,
    attempt_id: &str,
    version: u64,
) -> Result<(), DomainError> {
    flags::release(store, &paths::retry_marker(user_id, level, attempt_id)?, version).await
}
