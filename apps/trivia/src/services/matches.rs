//! Head-to-head match lifecycle: create, join, observe, answer, settle.

use std::sync::Arc;

use futures::StreamExt;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::docstore::{DocumentStore, Subscription, Versioned};
use crate::domain::match_state::check_status_transition;
use crate::domain::question::select_questions;
use crate::domain::{
    derive_match_events, LevelId, Match, MatchEvent, MatchId, MatchOutcome, MatchRules,
    MatchStatus,
};
use crate::errors::domain::DomainError;
use crate::repos::{matches, paths, profiles};
use crate::services::questions::QuestionProvider;
use crate::services::with_cas_retry;

/// One delivery from [`MatchWatch`]: the latest snapshot and what changed.
#[derive(Debug, Clone)]
pub struct MatchUpdate {
    pub snapshot: Versioned<Match>,
    pub events: Vec<MatchEvent>,
}

/// Live view of one match. Dropping it cancels the underlying subscription.
pub struct MatchWatch {
    match_id: MatchId,
    subscription: Subscription,
    last: Option<Versioned<Match>>,
}

impl MatchWatch {
    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }

    /// Most recent snapshot delivered so far.
    pub fn latest(&self) -> Option<&Versioned<Match>> {
        self.last.as_ref()
    }

    /// Wait for the next change. Returns `None` once the feed closes.
    ///
    /// Changes that are not newer than the last delivered snapshot, and
    /// documents that fail to decode, are skipped.
    pub async fn next(&mut self) -> Option<MatchUpdate> {
        while let Some(change) = self.subscription.next().await {
            let Some(value) = change.value else {
                debug!(match_id = %self.match_id, "Match document absent");
                continue;
            };
            if self
                .last
                .as_ref()
                .is_some_and(|prev| prev.version >= change.version)
            {
                continue;
            }
            let record: Match = match serde_json::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    warn!(match_id = %self.match_id, error = %e, "Undecodable match snapshot");
                    continue;
                }
            };
            let events = derive_match_events(self.last.as_ref().map(|m| &m.value), &record);
            let snapshot = Versioned {
                version: change.version,
                value: record,
            };
            self.last = Some(snapshot.clone());
            return Some(MatchUpdate { snapshot, events });
        }
        None
    }

    /// Wait until the match is finished and return its final snapshot.
    pub async fn wait_finished(&mut self) -> Option<Versioned<Match>> {
        if let Some(last) = &self.last {
            if last.value.status == MatchStatus::Finished {
                return Some(last.clone());
            }
        }
        while let Some(update) = self.next().await {
            if update.snapshot.value.status == MatchStatus::Finished {
                return Some(update.snapshot);
            }
        }
        None
    }
}

/// Coordinates shared match documents between two clients.
pub struct MatchCoordinator {
    store: Arc<dyn DocumentStore>,
    questions: Arc<dyn QuestionProvider>,
    rules: MatchRules,
    cas_retry_limit: u32,
}

impl MatchCoordinator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        questions: Arc<dyn QuestionProvider>,
        rules: MatchRules,
        cas_retry_limit: u32,
    ) -> Self {
        Self {
            store,
            questions,
            rules,
            cas_retry_limit,
        }
    }

    /// Open a new waiting match for `level` with `player_id` as player1.
    pub async fn create_match(
        &self,
        player_id: &str,
        level: LevelId,
    ) -> Result<MatchId, DomainError> {
        let fetched = self.questions.fetch_questions(level).await?;
        let questions = select_questions(
            fetched,
            self.rules.questions_per_match,
            self.rules.shuffle_seed,
        );
        let id = self.store.generate_key();
        let record = Match::new(
            id.clone(),
            level,
            player_id,
            questions,
            OffsetDateTime::now_utc(),
        )?;
        matches::insert_match(self.store.as_ref(), &record).await?;

        info!(match_id = %id, player_id, level, questions = record.questions.len(), "Match created");
        Ok(id)
    }

    /// Join the oldest waiting match for `level` not created by `player_id`.
    ///
    /// Returns `None` when no such match exists. A candidate taken by someone
    /// else between the scan and the write is skipped in favour of the next.
    pub async fn join_match(
        &self,
        player_id: &str,
        level: LevelId,
    ) -> Result<Option<MatchId>, DomainError> {
        let store = self.store.as_ref();
        let candidates = matches::list_waiting(store, level).await?;

        for candidate in candidates {
            if !candidate.value.is_joinable_by(player_id) {
                continue;
            }
            let joined = candidate
                .value
                .join(player_id)
                .and_then(|next| {
                    check_status_transition(candidate.value.status, next.status)?;
                    Ok(next)
                })?;
            match matches::save_match(store, candidate.version, &joined).await {
                Ok(saved) => {
                    info!(match_id = %saved.value.id, player_id, level, "Match joined");
                    return Ok(Some(saved.value.id));
                }
                Err(e) if e.is_optimistic_lock() => {
                    debug!(match_id = %candidate.value.id, player_id, "Candidate taken concurrently");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(player_id, level, "No joinable match");
        Ok(None)
    }

    /// Subscribe to every change of the match record.
    pub fn observe(&self, match_id: &MatchId) -> Result<MatchWatch, DomainError> {
        let subscription = self.store.subscribe(&paths::match_doc(match_id)?)?;
        Ok(MatchWatch {
            match_id: match_id.clone(),
            subscription,
            last: None,
        })
    }

    pub async fn load(&self, match_id: &MatchId) -> Result<Versioned<Match>, DomainError> {
        matches::require_match(self.store.as_ref(), match_id).await
    }

    /// Record the local player's answer to the current question.
    pub async fn submit_answer(
        &self,
        match_id: &MatchId,
        player_id: &str,
        is_correct: bool,
    ) -> Result<Versioned<Match>, DomainError> {
        let store = self.store.as_ref();
        let points = self.rules.points_per_correct;
        let saved = with_cas_retry("match_submit_answer", self.cas_retry_limit, move || async move {
            let current = matches::require_match(store, match_id).await?;
            let next = current.value.record_answer(player_id, is_correct, points)?;
            check_status_transition(current.value.status, next.status)?;
            matches::save_match(store, current.version, &next).await
        })
        .await?;

        debug!(
            match_id = %match_id,
            player_id,
            is_correct,
            question = saved.value.current_question,
            status = ?saved.value.status,
            "Match answer recorded"
        );
        Ok(saved)
    }

    /// Outcome of a finished match, `None` while answers are outstanding.
    ///
    /// When `local_player` won, the match level is marked completed for them.
    pub async fn settle(
        &self,
        match_id: &MatchId,
        local_player: &str,
    ) -> Result<Option<MatchOutcome>, DomainError> {
        let current = matches::require_match(self.store.as_ref(), match_id).await?;
        let Some(outcome) = current.value.outcome() else {
            return Ok(None);
        };

        if outcome == MatchOutcome::Winner(local_player.to_string()) {
            profiles::mark_level_completed(
                self.store.as_ref(),
                local_player,
                current.value.level_id,
            )
            .await?;
            info!(match_id = %match_id, winner = local_player, level = current.value.level_id, "Match won");
        } else {
            debug!(match_id = %match_id, local_player, ?outcome, "Match settled");
        }
        Ok(Some(outcome))
    }
}
