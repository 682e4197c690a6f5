//! Store catalog: `store/items/{id}`.

use crate::docstore::DocumentStore;
use crate::domain::StoreItem;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::{decode, encode, paths};

pub async fn list_items(store: &dyn DocumentStore) -> Result<Vec<StoreItem>, DomainError> {
    store
        .list(&paths::items()?)
        .await?
        .into_iter()
        .map(|(_, doc)| decode(doc).map(|d| d.value))
        .collect()
}

pub async fn require_item(store: &dyn DocumentStore, item_id: &str) -> Result<StoreItem, DomainError> {
    let doc = store
        .get(&paths::item(item_id)?)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Item, format!("item {item_id}")))?;
    Ok(decode(doc)?.value)
}

pub async fn put_item(store: &dyn DocumentStore, item: &StoreItem) -> Result<(), DomainError> {
    store.set(&paths::item(&item.id)?, encode(item)?).await?;
    Ok(())
}
