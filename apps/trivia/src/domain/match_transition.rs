use crate::domain::ids::UserId;
use crate::domain::match_state::{Match, MatchOutcome, MatchStatus};

/// What changed between two observed snapshots of the same match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    /// First snapshot delivered to an observer.
    Snapshot { status: MatchStatus },

    /// Explicit: a second player took the open seat
    PlayerJoined { user_id: UserId },

    /// Edge-triggered: Waiting -> Active
    MatchStarted,

    /// Edge-triggered: the shared question index moved forward.
    QuestionAdvanced { index: usize },

    /// A player's score changed.
    ScoreChanged { user_id: UserId, score: u32 },

    /// Edge-triggered: !Finished -> Finished
    MatchFinished { outcome: Option<MatchOutcome> },
}

/// Derive events from before/after snapshots.
///
/// Observers can miss intermediate writes, so every check compares the two
/// snapshots directly rather than assuming a single step happened.
pub fn derive_match_events(before: Option<&Match>, after: &Match) -> Vec<MatchEvent> {
    let Some(before) = before else {
        return vec![MatchEvent::Snapshot {
            status: after.status,
        }];
    };

    let mut events = Vec::new();

    // 1. Seat filled
    if before.player2.is_none() {
        if let Some(p2) = &after.player2 {
            events.push(MatchEvent::PlayerJoined {
                user_id: p2.user_id.clone(),
            });
        }
    }

    // 2. Start (Waiting -> !Waiting)
    if before.status == MatchStatus::Waiting && after.status != MatchStatus::Waiting {
        events.push(MatchEvent::MatchStarted);
    }

    // 3. Scores
    if before.player1.score != after.player1.score {
        events.push(MatchEvent::ScoreChanged {
            user_id: after.player1.user_id.clone(),
            score: after.player1.score,
        });
    }
    if let Some(p2) = &after.player2 {
        let prev = before.player2.as_ref().map(|p| p.score).unwrap_or(0);
        if prev != p2.score {
            events.push(MatchEvent::ScoreChanged {
                user_id: p2.user_id.clone(),
                score: p2.score,
            });
        }
    }

    // 4. Question index
    if after.current_question > before.current_question && after.current().is_some() {
        events.push(MatchEvent::QuestionAdvanced {
            index: after.current_question,
        });
    }

    // 5. End
    if before.status != MatchStatus::Finished && after.status == MatchStatus::Finished {
        events.push(MatchEvent::MatchFinished {
            outcome: after.outcome(),
        });
    }

    events
}
