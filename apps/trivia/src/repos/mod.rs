//! Typed access to documents. Each function maps one domain record to its
//! store path and decodes it, nothing more; rules live in `domain`.

pub mod flags;
pub mod items;
pub mod matches;
pub mod profiles;
pub mod purchases;
pub mod questions;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::docstore::{DocPath, Versioned};
use crate::domain::{LevelId, MatchId};
use crate::errors::domain::DomainError;

/// Store layout. All paths are built here.
pub mod paths {
    use super::{DocPath, DomainError, LevelId, MatchId};

    pub fn matches() -> Result<DocPath, DomainError> {
        DocPath::parse("matches")
    }

    pub fn match_doc(id: &MatchId) -> Result<DocPath, DomainError> {
        matches()?.child(id)
    }

    pub fn profile(user_id: &str) -> Result<DocPath, DomainError> {
        DocPath::parse("users")?.child(user_id)
    }

    pub fn completed_level(user_id: &str, level: LevelId) -> Result<DocPath, DomainError> {
        DocPath::parse("progress")?
            .child(user_id)?
            .child(level.to_string())
    }

    /// Marks the one paid retry of a single level attempt.
    pub fn retry_marker(
        user_id: &str,
        level: LevelId,
        attempt_id: &str,
    ) -> Result<DocPath, DomainError> {
        DocPath::parse("retries")?
            .child(user_id)?
            .child(level.to_string())?
            .child(attempt_id)
    }

    pub fn purchases(user_id: &str) -> Result<DocPath, DomainError> {
        DocPath::parse("purchases")?.child(user_id)
    }

    pub fn purchase(user_id: &str, item_id: &str) -> Result<DocPath, DomainError> {
        purchases(user_id)?.child(item_id)
    }

    pub fn items() -> Result<DocPath, DomainError> {
        DocPath::parse("store/items")
    }

    pub fn item(item_id: &str) -> Result<DocPath, DomainError> {
        items()?.child(item_id)
    }

    pub fn questions(level: LevelId) -> Result<DocPath, DomainError> {
        DocPath::parse("questions")?.child(level.to_string())
    }
}

pub(crate) fn decode<T: DeserializeOwned>(doc: Versioned<Value>) -> Result<Versioned<T>, DomainError> {
    Ok(Versioned {
        version: doc.version,
        value: serde_json::from_value(doc.value)?,
    })
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Value, DomainError> {
    Ok(serde_json::to_value(value)?)
}
