//! Single-player level progression as pure transitions over [`LevelRun`].

use crate::domain::ids::LevelId;
use crate::domain::rules::LevelRules;
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    InProgress,
    /// Lives hit zero. Only a retry can resume the run.
    OutOfLives,
    Completed,
}

/// One attempt at a level. Values are never mutated in place; every
/// transition returns the next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRun {
    pub level_id: LevelId,
    pub question_count: usize,
    /// Number of questions consumed so far.
    pub question_index: usize,
    pub lives: u8,
    pub score: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// Consecutive correct answers.
    pub streak: u32,
    pub best_streak: u32,
    pub retry_used: bool,
    pub phase: RunPhase,
    /// Store-wide id of this attempt, assigned when a service starts the run.
    pub attempt_id: Option<String>,
}

impl LevelRun {
    pub fn start(
        level_id: LevelId,
        question_count: usize,
        rules: &LevelRules,
    ) -> Result<Self, DomainError> {
        if question_count == 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidQuestionSet,
                format!("level {level_id} has no questions"),
            ));
        }
        Ok(Self {
            level_id,
            question_count,
            question_index: 0,
            lives: rules.starting_lives,
            score: 0,
            correct: 0,
            incorrect: 0,
            streak: 0,
            best_streak: 0,
            retry_used: false,
            phase: RunPhase::InProgress,
            attempt_id: None,
        })
    }

    pub fn with_attempt_id(self, attempt_id: impl Into<String>) -> Self {
        Self {
            attempt_id: Some(attempt_id.into()),
            ..self
        }
    }

    /// Apply one answer. The question is consumed either way.
    pub fn submit_answer(&self, is_correct: bool, rules: &LevelRules) -> Result<Self, DomainError> {
        if self.phase != RunPhase::InProgress {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("run is {:?}, cannot answer", self.phase),
            ));
        }

        let mut next = self.clone();
        if is_correct {
            next.correct += 1;
            next.score = next.score.saturating_add(rules.points_per_correct);
            next.streak += 1;
            next.best_streak = next.best_streak.max(next.streak);
        } else {
            next.incorrect += 1;
            next.lives = next.lives.saturating_sub(1);
            next.streak = 0;
        }
        next.question_index += 1;
        next.phase = next.phase_after_answer();
        Ok(next)
    }

    fn phase_after_answer(&self) -> RunPhase {
        if self.lives == 0 {
            RunPhase::OutOfLives
        } else if self.question_index >= self.question_count {
            RunPhase::Completed
        } else {
            RunPhase::InProgress
        }
    }

    /// Spend one retry: restores a life and resumes the run.
    ///
    /// `balance` is the user's stored point balance read just before the call.
    /// The caller deducts `rules.retry_cost` from the store.
    pub fn apply_retry(&self, balance: u32, rules: &LevelRules) -> Result<Self, DomainError> {
        if self.retry_used {
            return Err(DomainError::validation(
                ValidationKind::RetryAlreadyUsed,
                format!("retry already used on level {}", self.level_id),
            ));
        }
        if self.phase != RunPhase::OutOfLives {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("run is {:?}, retry needs OutOfLives", self.phase),
            ));
        }
        if balance < rules.retry_cost {
            return Err(DomainError::insufficient_balance(rules.retry_cost, balance));
        }

        let mut next = self.clone();
        next.lives = 1;
        next.retry_used = true;
        next.phase = if next.question_index >= next.question_count {
            RunPhase::Completed
        } else {
            RunPhase::InProgress
        };
        Ok(next)
    }

    /// No incorrect answers, or exactly one paid for with the retry.
    pub fn is_perfect(&self) -> bool {
        self.incorrect == 0 || (self.incorrect == 1 && self.retry_used)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RunPhase::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoUnlockReason {
    NotPerfect,
    /// Replaying a level the user already moved past.
    BelowFrontier,
    /// Completion for this level was already recorded.
    AlreadyCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishDecision {
    Unlock {
        next_level: LevelId,
        points_awarded: u32,
    },
    NoUnlock(NoUnlockReason),
}

/// Decide what finishing `run` earns, given the user's current frontier.
pub fn evaluate_finish(
    run: &LevelRun,
    frontier: LevelId,
    already_completed: bool,
    rules: &LevelRules,
) -> Result<FinishDecision, DomainError> {
    if !run.is_finished() {
        return Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("run is {:?}, not completed", run.phase),
        ));
    }
    if run.level_id > frontier {
        return Err(DomainError::validation(
            ValidationKind::LevelLocked,
            format!("level {} is above frontier {frontier}", run.level_id),
        ));
    }
    if already_completed {
        return Ok(FinishDecision::NoUnlock(NoUnlockReason::AlreadyCompleted));
    }
    if !run.is_perfect() {
        return Ok(FinishDecision::NoUnlock(NoUnlockReason::NotPerfect));
    }
    if run.level_id < frontier {
        return Ok(FinishDecision::NoUnlock(NoUnlockReason::BelowFrontier));
    }
    Ok(FinishDecision::Unlock {
        next_level: frontier + 1,
        points_awarded: run.score.saturating_add(rules.level_up_bonus),
    })
}
