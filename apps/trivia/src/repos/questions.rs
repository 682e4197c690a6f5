//! Question sets: `questions/{level}` holds an array of questions.

use crate::docstore::DocumentStore;
use crate::domain::{LevelId, Question};
use crate::errors::domain::DomainError;
use crate::repos::{decode, encode, paths};

pub async fn find_questions(
    store: &dyn DocumentStore,
    level: LevelId,
) -> Result<Option<Vec<Question>>, DomainError> {
    match store.get(&paths::questions(level)?).await? {
        Some(doc) => Ok(Some(decode(doc)?.value)),
        None => Ok(None),
    }
}

pub async fn put_questions(
    store: &dyn DocumentStore,
    level: LevelId,
    questions: &[Question],
) -> Result<(), DomainError> {
    store.set(&paths::questions(level)?, encode(&questions)?).await?;
    Ok(())
}
