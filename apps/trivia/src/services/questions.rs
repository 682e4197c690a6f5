use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::docstore::DocumentStore;
use crate::domain::question::validate_question_set;
use crate::domain::{LevelId, Question};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::questions as questions_repo;

/// Source of ordered question sets, keyed by level.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    async fn fetch_questions(&self, level: LevelId) -> Result<Vec<Question>, DomainError>;
}

/// Serves question sets stored under `questions/{level}`.
pub struct StoreQuestionProvider {
    store: Arc<dyn DocumentStore>,
}

impl StoreQuestionProvider {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QuestionProvider for StoreQuestionProvider {
    async fn fetch_questions(&self, level: LevelId) -> Result<Vec<Question>, DomainError> {
        let questions = questions_repo::find_questions(self.store.as_ref(), level)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Questions, format!("level {level}"))
            })?;
        validate_question_set(&questions)?;
        debug!(level, count = questions.len(), "Fetched question set");
        Ok(questions)
    }
}
