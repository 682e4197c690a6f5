use serde::{Deserialize, Serialize};

use crate::domain::profile::UserProfile;
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Avatar,
    Theme,
    Badge,
}

/// Cosmetic item in the store catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub price: u32,
    pub kind: ItemKind,
}

/// Profile after paying for `item`, or why the purchase is refused.
pub fn charge_for(
    profile: &UserProfile,
    item: &StoreItem,
    already_owned: bool,
) -> Result<UserProfile, DomainError> {
    if already_owned {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyOwned,
            format!("{} already owns {}", profile.user_id, item.id),
        ));
    }
    profile.debit(item.price)
}
