#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod docstore;
pub mod domain;
pub mod error;
pub mod errors;
pub mod logging;
pub mod repos;
pub mod services;
pub mod state;
pub mod telemetry;


// Re-exports for public API
pub use config::GameConfig;
pub use docstore::{DocChange, DocPath, DocumentStore, InMemoryStore, Subscription, Versioned};
pub use domain::{
    FinishDecision, LevelRun, Match, MatchEvent, MatchOutcome, MatchStatus, NoUnlockReason,
    Question, RunPhase, StoreItem, UserProfile,
};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use services::auth::{AuthProvider, InMemoryAuth};
pub use services::gallery::{GalleryWriter, HttpGalleryWriter};
pub use services::levels::{LevelService, LevelSession};
pub use services::matches::{MatchCoordinator, MatchUpdate, MatchWatch};
pub use services::questions::{QuestionProvider, StoreQuestionProvider};
pub use services::shop::ShopService;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
