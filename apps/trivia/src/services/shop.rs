use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::docstore::DocumentStore;
use crate::domain::shop::charge_for;
use crate::domain::{StoreItem, UserProfile};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::{items, profiles, purchases};
use crate::services::with_cas_retry;

/// Cosmetic store.
pub struct ShopService {
    store: Arc<dyn DocumentStore>,
    cas_retry_limit: u32,
}

impl ShopService {
    pub fn new(store: Arc<dyn DocumentStore>, cas_retry_limit: u32) -> Self {
        Self {
            store,
            cas_retry_limit,
        }
    }

    pub async fn list_items(&self) -> Result<Vec<StoreItem>, DomainError> {
        items::list_items(self.store.as_ref()).await
    }

    pub async fn owned_items(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        purchases::list_owned(self.store.as_ref(), user_id).await
    }

    /// Buy `item_id`: claim ownership, then deduct the price.
    ///
    /// Ownership is claimed with a compare-and-set on the purchase flag, so of
    /// two concurrent purchases of the same item only one gets to pay. The
    /// deduction is a compare-and-set on the profile. If it fails the claim
    /// is released and nothing was charged.
    pub async fn purchase(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<UserProfile, DomainError> {
        let store = self.store.as_ref();
        let item = items::require_item(store, item_id).await?;
        let item = &item;

        let claimed = with_cas_retry("purchase_claim", self.cas_retry_limit, move || async move {
            purchases::claim_owned(store, user_id, &item.id).await
        })
        .await?;
        let Some(claim_version) = claimed else {
            debug!(user_id, item_id, "Purchase rejected: already owned");
            return Err(DomainError::conflict(
                ConflictKind::AlreadyOwned,
                format!("{user_id} already owns {}", item.id),
            ));
        };

        let charged = with_cas_retry("purchase", self.cas_retry_limit, move || async move {
            let profile = profiles::require_profile(store, user_id).await?;
            // The claim above is ours; ownership is not re-checked here.
            let charged = charge_for(&profile.value, item, false)?;
            profiles::save_profile(store, profile.version, &charged).await
        })
        .await;

        let charged = match charged {
            Ok(charged) => charged,
            Err(e) => {
                if matches!(e, DomainError::InsufficientBalance { .. }) {
                    warn!(user_id, item_id, price = item.price, "Purchase rejected: insufficient points");
                }
                if let Err(release_err) =
                    purchases::release_owned(store, user_id, &item.id, claim_version).await
                {
                    warn!(user_id, item_id, error = %release_err, "Purchase claim left in place");
                }
                return Err(e);
            }
        };

        info!(
            user_id,
            item_id,
            price = item.price,
            balance = charged.value.points,
            "Item purchased"
        );
        Ok(charged.value)
    }
}
