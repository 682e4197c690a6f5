//! Purchase flags: `purchases/{user}/{item} = true`.

use serde_json::Value;

use crate::docstore::DocumentStore;
use crate::errors::domain::DomainError;
use crate::repos::{flags, paths};

/// Claim ownership of `item_id`. `None` when the user already owns it.
pub async fn claim_owned(
    store: &dyn DocumentStore,
    user_id: &str,
    item_id: &str,
) -> Result<Option<u64>, DomainError> {
    flags::claim(store, &paths::purchase(user_id, item_id)?).await
}

/// Drop a claim made by [`claim_owned`] whose payment did not go through.
pub async fn release_owned(
    store: &dyn DocumentStore,
    user_id: &str,
    item_id: &str,
    version: u64,
) -> Result<(), DomainError> {
    flags::release(store, &paths::purchase(user_id, item_id)?, version).await
}

/// Item ids the user owns, in key order.
pub async fn list_owned(store: &dyn DocumentStore, user_id: &str) -> Result<Vec<String>, DomainError> {
    Ok(store
        .list(&paths::purchases(user_id)?)
        .await?
        .into_iter()
        .filter(|(_, doc)| doc.value == Value::Bool(true))
        .map(|(key, _)| key)
        .collect())
}
