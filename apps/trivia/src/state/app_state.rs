use std::sync::Arc;

use crate::config::GameConfig;
use crate::docstore::{DocumentStore, InMemoryStore};
use crate::error::AppError;
use crate::services::auth::{AuthProvider, InMemoryAuth};
use crate::services::gallery::{GalleryWriter, HttpGalleryWriter};
use crate::services::levels::LevelService;
use crate::services::matches::MatchCoordinator;
use crate::services::questions::{QuestionProvider, StoreQuestionProvider};
use crate::services::shop::ShopService;

/// Services wired against one document store and one configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: GameConfig,
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub questions: Arc<dyn QuestionProvider>,
    pub gallery: Arc<dyn GalleryWriter>,
    pub levels: Arc<LevelService>,
    pub matches: Arc<MatchCoordinator>,
    pub shop: Arc<ShopService>,
}

impl AppState {
    /// Wire the default adapters over `store`. Fails on invalid configuration.
    pub fn new(config: GameConfig, store: Arc<dyn DocumentStore>) -> Result<Self, AppError> {
        config.validate()?;

        let questions: Arc<dyn QuestionProvider> =
            Arc::new(StoreQuestionProvider::new(store.clone()));
        let gallery: Arc<dyn GalleryWriter> =
            Arc::new(HttpGalleryWriter::new(config.gallery_dir.clone())?);
        let auth: Arc<dyn AuthProvider> = Arc::new(InMemoryAuth::new(store.clone()));

        let levels = Arc::new(LevelService::new(
            store.clone(),
            questions.clone(),
            config.level_rules(),
            config.cas_retry_limit,
        ));
        let matches = Arc::new(MatchCoordinator::new(
            store.clone(),
            questions.clone(),
            config.match_rules(),
            config.cas_retry_limit,
        ));
        let shop = Arc::new(ShopService::new(store.clone(), config.cas_retry_limit));

        Ok(Self {
            config,
            store,
            auth,
            questions,
            gallery,
            levels,
            matches,
            shop,
        })
    }

    /// Load configuration from the environment and use a fresh in-memory store.
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(GameConfig::from_env()?, Arc::new(InMemoryStore::new()))
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        #[allow(clippy::expect_used)]
        Self::new(GameConfig::default(), Arc::new(InMemoryStore::new()))
            .expect("default config is valid")
    }
}
