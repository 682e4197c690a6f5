use serde::{Deserialize, Serialize};

use crate::domain::ids::{LevelId, UserId, FIRST_LEVEL};
use crate::errors::domain::DomainError;

/// Per-user document holding the point balance and the unlock frontier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub points: u32,
    /// Highest level the user may play.
    #[serde(default = "first_level")]
    pub unlocked_level: LevelId,
}

fn first_level() -> LevelId {
    FIRST_LEVEL
}

impl UserProfile {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
            points: 0,
            unlocked_level: FIRST_LEVEL,
        }
    }

    /// Deduct `amount`, failing without change when the balance is short.
    pub fn debit(&self, amount: u32) -> Result<Self, DomainError> {
        let points = self
            .points
            .checked_sub(amount)
            .ok_or_else(|| DomainError::insufficient_balance(amount, self.points))?;
        Ok(Self {
            points,
            ..self.clone()
        })
    }

    pub fn credit(&self, amount: u32) -> Self {
        Self {
            points: self.points.saturating_add(amount),
            ..self.clone()
        }
    }

    /// Move the frontier forward. Never moves it back.
    pub fn unlock(&self, level: LevelId) -> Self {
        Self {
            unlocked_level: self.unlocked_level.max(level),
            ..self.clone()
        }
    }

    pub fn can_play(&self, level: LevelId) -> bool {
        (FIRST_LEVEL..=self.unlocked_level).contains(&level)
    }
}
