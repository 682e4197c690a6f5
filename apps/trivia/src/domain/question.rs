use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ValidationKind};

/// One candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

/// A question record as served by the question provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Optional image reference (URL or storage key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub answers: Vec<Answer>,
}

impl Question {
    /// Index of the single correct answer, if the question is well formed.
    pub fn correct_index(&self) -> Option<usize> {
        let mut correct = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.correct)
            .map(|(i, _)| i);
        match (correct.next(), correct.next()) {
            (Some(i), None) => Some(i),
            _ => None,
        }
    }

    /// Whether `choice` picks the correct answer. Out-of-range choices are wrong.
    pub fn is_correct(&self, choice: usize) -> bool {
        self.answers.get(choice).is_some_and(|a| a.correct)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.answers.len() < 2 {
            return Err(DomainError::validation(
                ValidationKind::InvalidQuestionSet,
                format!("question {} has fewer than two answers", self.id),
            ));
        }
        if self.correct_index().is_none() {
            return Err(DomainError::validation(
                ValidationKind::InvalidQuestionSet,
                format!("question {} must have exactly one correct answer", self.id),
            ));
        }
        Ok(())
    }
}

/// Validate a whole question set: non-empty and every question well formed.
pub fn validate_question_set(questions: &[Question]) -> Result<(), DomainError> {
    if questions.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidQuestionSet,
            "question set is empty",
        ));
    }
    questions.iter().try_for_each(Question::validate)
}

/// Pick up to `count` questions, shuffled deterministically when a seed is given.
pub fn select_questions(
    mut questions: Vec<Question>,
    count: usize,
    seed: Option<u64>,
) -> Vec<Question> {
    if let Some(seed) = seed {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        questions.shuffle(&mut rng);
    }
    questions.truncate(count);
    questions
}
