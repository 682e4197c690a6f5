//! Domain layer: pure trivia types and transitions.

pub mod ids;
pub mod level;
pub mod match_state;
pub mod match_transition;
pub mod profile;
pub mod question;
pub mod rules;
pub mod shop;

#[cfg(test)]
mod tests_props_level;

// Re-exports for ergonomics
pub use ids::{LevelId, MatchId, UserId, FIRST_LEVEL};
pub use level::{evaluate_finish, FinishDecision, LevelRun, NoUnlockReason, RunPhase};
pub use match_state::{Match, MatchOutcome, MatchPlayer, MatchStatus, Seat};
pub use match_transition::{derive_match_events, MatchEvent};
pub use profile::UserProfile;
pub use question::{Answer, Question};
pub use rules::{LevelRules, MatchRules};
pub use shop::{ItemKind, StoreItem};
