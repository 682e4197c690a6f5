use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::ids::{LevelId, MatchId, UserId};
use crate::domain::question::{validate_question_set, Question};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Match lifecycle. Only ever moves forward: Waiting → Active → Finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Created by player1, open for a second player.
    Waiting,
    /// Both seats filled, questions being answered.
    Active,
    /// Every question answered by both players.
    Finished,
}

impl MatchStatus {
    fn ordinal(self) -> u8 {
        match self {
            MatchStatus::Waiting => 0,
            MatchStatus::Active => 1,
            MatchStatus::Finished => 2,
        }
    }

    /// True when `next` is the same status or a later one.
    pub fn can_advance_to(self, next: MatchStatus) -> bool {
        next.ordinal() >= self.ordinal()
    }
}

/// Reject a write that would move a match status backwards.
pub fn check_status_transition(from: MatchStatus, to: MatchStatus) -> Result<(), DomainError> {
    if from.can_advance_to(to) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::PhaseMismatch,
            format!("match status cannot move from {from:?} to {to:?}"),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Player1,
    Player2,
}

/// One player's side of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPlayer {
    pub user_id: UserId,
    pub score: u32,
    /// `answered[i]` is set once this player has answered question `i`.
    pub answered: Vec<bool>,
}

impl MatchPlayer {
    fn new(user_id: &str, question_count: usize) -> Self {
        Self {
            user_id: user_id.to_string(),
            score: 0,
            answered: vec![false; question_count],
        }
    }

    pub fn answered_all(&self) -> bool {
        self.answered.iter().all(|a| *a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner(UserId),
    Draw,
}

/// Shared record coordinating two players' synchronized trivia session.
///
/// Every mutation is a pure function returning the next value; the caller is
/// responsible for writing it back with the version it read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub level_id: LevelId,
    /// The creator. Present from creation onwards.
    pub player1: MatchPlayer,
    #[serde(default)]
    pub player2: Option<MatchPlayer>,
    /// Index of the question both players are currently on.
    pub current_question: usize,
    pub questions: Vec<Question>,
    pub status: MatchStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Match {
    pub fn new(
        id: MatchId,
        level_id: LevelId,
        creator: &str,
        questions: Vec<Question>,
        created_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_question_set(&questions)?;
        Ok(Self {
            id,
            level_id,
            player1: MatchPlayer::new(creator, questions.len()),
            player2: None,
            current_question: 0,
            questions,
            status: MatchStatus::Waiting,
            created_at,
        })
    }

    pub fn seat_of(&self, user_id: &str) -> Option<Seat> {
        if self.player1.user_id == user_id {
            Some(Seat::Player1)
        } else if self
            .player2
            .as_ref()
            .is_some_and(|p| p.user_id == user_id)
        {
            Some(Seat::Player2)
        } else {
            None
        }
    }

    pub fn player(&self, seat: Seat) -> Option<&MatchPlayer> {
        match seat {
            Seat::Player1 => Some(&self.player1),
            Seat::Player2 => self.player2.as_ref(),
        }
    }

    fn player_mut(&mut self, seat: Seat) -> Option<&mut MatchPlayer> {
        match seat {
            Seat::Player1 => Some(&mut self.player1),
            Seat::Player2 => self.player2.as_mut(),
        }
    }

    /// The question both players are on, `None` once the match has run out.
    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.current_question)
    }

    pub fn is_joinable_by(&self, user_id: &str) -> bool {
        self.status == MatchStatus::Waiting
            && self.player2.is_none()
            && self.player1.user_id != user_id
    }

    /// Seat `user_id` as player2 and activate the match.
    pub fn join(&self, user_id: &str) -> Result<Self, DomainError> {
        if self.player1.user_id == user_id {
            return Err(DomainError::validation(
                ValidationKind::SelfJoin,
                format!("player {user_id} created match {}", self.id),
            ));
        }
        if self.status != MatchStatus::Waiting || self.player2.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::MatchNotJoinable,
                format!("match {} is {:?}", self.id, self.status),
            ));
        }

        let mut next = self.clone();
        next.player2 = Some(MatchPlayer::new(user_id, self.questions.len()));
        next.status = MatchStatus::Active;
        Ok(next)
    }

    /// Record `user_id`'s answer to the current question.
    ///
    /// The shared question index advances once both players have answered it;
    /// the match finishes when every flag on both sides is set.
    pub fn record_answer(
        &self,
        user_id: &str,
        is_correct: bool,
        points: u32,
    ) -> Result<Self, DomainError> {
        if self.status != MatchStatus::Active {
            return Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("match {} is {:?}, not active", self.id, self.status),
            ));
        }
        let seat = self.seat_of(user_id).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::NotAMatchPlayer,
                format!("{user_id} is not playing match {}", self.id),
            )
        })?;
        let idx = self.current_question;

        let mut next = self.clone();
        let player = next.player_mut(seat).ok_or_else(|| {
            DomainError::validation(ValidationKind::NotAMatchPlayer, "seat is empty")
        })?;
        match player.answered.get_mut(idx) {
            Some(flag) if *flag => {
                return Err(DomainError::validation(
                    ValidationKind::AlreadyAnswered,
                    format!("{user_id} already answered question {idx}"),
                ));
            }
            Some(flag) => *flag = true,
            None => {
                return Err(DomainError::validation(
                    ValidationKind::PhaseMismatch,
                    format!("match {} has no question {idx}", self.id),
                ));
            }
        }
        if is_correct {
            player.score = player.score.saturating_add(points);
        }

        if next.both_answered(idx) {
            next.current_question = idx + 1;
        }
        if next.all_answered() {
            next.status = MatchStatus::Finished;
        }
        Ok(next)
    }

    fn both_answered(&self, idx: usize) -> bool {
        let answered = |p: &MatchPlayer| p.answered.get(idx).copied().unwrap_or(false);
        answered(&self.player1) && self.player2.as_ref().is_some_and(answered)
    }

    /// True once both players have answered every question.
    pub fn all_answered(&self) -> bool {
        self.player1.answered_all() && self.player2.as_ref().is_some_and(|p| p.answered_all())
    }

    /// Winner or draw, available only once all answers are in.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if !self.all_answered() {
            return None;
        }
        let p2 = self.player2.as_ref()?;
        let p1 = &self.player1;
        Some(match p1.score.cmp(&p2.score) {
            std::cmp::Ordering::Greater => MatchOutcome::Winner(p1.user_id.clone()),
            std::cmp::Ordering::Less => MatchOutcome::Winner(p2.user_id.clone()),
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        })
    }
}
