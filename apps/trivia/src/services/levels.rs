//! Single-player level runs: start, answer, retry with points, finish.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::docstore::DocumentStore;
use crate::domain::level::{evaluate_finish, FinishDecision, LevelRun, NoUnlockReason};
use crate::domain::{LevelId, LevelRules, Question, FIRST_LEVEL};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::profiles;
use crate::services::questions::QuestionProvider;
use crate::services::with_cas_retry;

/// A started level: the question set and the run state over it.
#[derive(Debug, Clone)]
pub struct LevelSession {
    pub questions: Vec<Question>,
    pub run: LevelRun,
}

impl LevelSession {
    /// The question the run is on, if it still has one.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.run.question_index)
    }
}

/// Level domain service.
pub struct LevelService {
    store: Arc<dyn DocumentStore>,
    questions: Arc<dyn QuestionProvider>,
    rules: LevelRules,
    cas_retry_limit: u32,
}

impl LevelService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        questions: Arc<dyn QuestionProvider>,
        rules: LevelRules,
        cas_retry_limit: u32,
    ) -> Self {
        Self {
            store,
            questions,
            rules,
            cas_retry_limit,
        }
    }

    pub fn rules(&self) -> &LevelRules {
        &self.rules
    }

    /// Begin an attempt at `level`. Levels above the user's frontier are locked.
    pub async fn start_level(
        &self,
        user_id: &str,
        level: LevelId,
    ) -> Result<LevelSession, DomainError> {
        if level < FIRST_LEVEL {
            return Err(DomainError::validation(
                ValidationKind::InvalidLevel,
                format!("level {level} does not exist"),
            ));
        }
        let profile = profiles::require_profile(self.store.as_ref(), user_id).await?;
        if !profile.value.can_play(level) {
            return Err(DomainError::validation(
                ValidationKind::LevelLocked,
                format!(
                    "level {level} is locked (frontier {})",
                    profile.value.unlocked_level
                ),
            ));
        }

        let mut questions = self.questions.fetch_questions(level).await?;
        questions.truncate(self.rules.questions_per_level);
        let run = LevelRun::start(level, questions.len(), &self.rules)?
            .with_attempt_id(self.store.generate_key());
        debug!(user_id, level, attempt_id = ?run.attempt_id, questions = questions.len(), "Level started");
        Ok(LevelSession { questions, run })
    }

    /// Apply one answer to the run. Pure; nothing is written.
    pub fn submit_answer(&self, run: &LevelRun, is_correct: bool) -> Result<LevelRun, DomainError> {
        run.submit_answer(is_correct, &self.rules)
    }

    /// Answer the session's current question by choice index.
    pub fn answer(&self, session: &LevelSession, choice: usize) -> Result<LevelSession, DomainError> {
        let question = session.current_question().ok_or_else(|| {
            DomainError::validation(ValidationKind::PhaseMismatch, "no question left to answer")
        })?;
        let run = self.submit_answer(&session.run, question.is_correct(choice))?;
        Ok(LevelSession {
            questions: session.questions.clone(),
            run,
        })
    }

    /// Spend `retry_cost` points from the stored balance to resume an
    /// out-of-lives run.
    ///
    /// The retry is recorded in the store against the run's attempt id before
    /// any points move, so replaying the same run cannot charge twice. If the
    /// charge then fails the record is released.
    pub async fn retry_using_points(
        &self,
        user_id: &str,
        run: &LevelRun,
    ) -> Result<LevelRun, DomainError> {
        let store = self.store.as_ref();
        let rules = &self.rules;
        let level = run.level_id;
        let attempt_id = run.attempt_id.as_deref().ok_or_else(|| {
            DomainError::validation(
                ValidationKind::Other("UNTRACKED_RUN".into()),
                "run was not started through start_level",
            )
        })?;

        let profile = profiles::require_profile(store, user_id).await?;
        run.apply_retry(profile.value.points, rules)?;

        let claimed = with_cas_retry("retry_claim", self.cas_retry_limit, move || async move {
            profiles::claim_retry(store, user_id, level, attempt_id).await
        })
        .await?;
        let Some(claim_version) = claimed else {
            return Err(DomainError::validation(
                ValidationKind::RetryAlreadyUsed,
                format!("retry already used on level {level} attempt {attempt_id}"),
            ));
        };

        let resumed = with_cas_retry("retry_using_points", self.cas_retry_limit, move || async move {
            let profile = profiles::require_profile(store, user_id).await?;
            // Balance is checked against the value read on this attempt.
            let resumed = run.apply_retry(profile.value.points, rules)?;
            let charged = profile.value.debit(rules.retry_cost)?;
            profiles::save_profile(store, profile.version, &charged).await?;
            Ok(resumed)
        })
        .await;

        let resumed = match resumed {
            Ok(resumed) => resumed,
            Err(e) => {
                if let Err(release_err) =
                    profiles::release_retry(store, user_id, level, attempt_id, claim_version).await
                {
                    warn!(user_id, level, attempt_id, error = %release_err, "Retry marker left in place");
                }
                return Err(e);
            }
        };

        info!(
            user_id,
            level,
            attempt_id,
            cost = self.rules.retry_cost,
            "Retry purchased with points"
        );
        Ok(resumed)
    }

    /// Settle a completed run: unlock the next level and award points when
    /// the run was perfect on the user's frontier level.
    ///
    /// A level whose completion is already recorded earns nothing again.
    ///
    /// The profile (frontier and points) is written first, under
    /// compare-and-set, and the completion flag second. If the flag write is
    /// lost, the frontier already sits one past the level; finishing the
    /// level again then writes the flag and reports it as already completed,
    /// without awarding anything.
    pub async fn finish_level(
        &self,
        user_id: &str,
        run: &LevelRun,
    ) -> Result<FinishDecision, DomainError> {
        let store = self.store.as_ref();
        let rules = &self.rules;
        let decision = with_cas_retry("finish_level", self.cas_retry_limit, move || async move {
            let profile = profiles::require_profile(store, user_id).await?;
            let frontier = profile.value.unlocked_level;
            let already_completed =
                profiles::is_level_completed(store, user_id, run.level_id).await?;
            let decision = evaluate_finish(run, frontier, already_completed, rules)?;

            match decision {
                FinishDecision::Unlock {
                    next_level,
                    points_awarded,
                } => {
                    let updated = profile.value.unlock(next_level).credit(points_awarded);
                    profiles::save_profile(store, profile.version, &updated).await?;
                    profiles::mark_level_completed(store, user_id, run.level_id).await?;
                    Ok(decision)
                }
                FinishDecision::NoUnlock(NoUnlockReason::BelowFrontier)
                    if run.level_id + 1 == frontier =>
                {
                    warn!(user_id, level = run.level_id, "Restoring missing completion flag");
                    profiles::mark_level_completed(store, user_id, run.level_id).await?;
                    Ok(FinishDecision::NoUnlock(NoUnlockReason::AlreadyCompleted))
                }
                FinishDecision::NoUnlock(_) => Ok(decision),
            }
        })
        .await?;

        info!(user_id, level = run.level_id, ?decision, "Level finished");
        Ok(decision)
    }
}
