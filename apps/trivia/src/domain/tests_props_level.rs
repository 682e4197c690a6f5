//! Property tests for level progression (pure domain, no store).
//!
//! Contract:
//! - Lives never drop below zero, whatever the answer sequence
//! - Score only grows on correct answers, by exactly points_per_correct
//! - A retry succeeds at most once per attempt, and only with enough balance
//! - Unlock moves the frontier by exactly one, and never below the frontier

use proptest::prelude::*;

use crate::domain::level::{evaluate_finish, FinishDecision, LevelRun, RunPhase};
use crate::domain::rules::LevelRules;
use crate::domain::test_prelude;

fn rules_strategy() -> impl Strategy<Value = LevelRules> {
    (1usize..=12, 1u32..=5, 1u8..=4, 0u32..=50, 0u32..=20).prop_map(
        |(questions_per_level, points_per_correct, starting_lives, retry_cost, level_up_bonus)| {
            LevelRules {
                questions_per_level,
                points_per_correct,
                starting_lives,
                retry_cost,
                level_up_bonus,
            }
        },
    )
}

/// An answer, or a request to retry (with the given balance).
#[derive(Debug, Clone)]
enum Step {
    Answer(bool),
    Retry(u32),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => any::<bool>().prop_map(Step::Answer),
        1 => (0u32..=60).prop_map(Step::Retry),
    ]
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    #[test]
    fn prop_lives_and_score_invariants(
        rules in rules_strategy(),
        steps in prop::collection::vec(step_strategy(), 0..40),
    ) {
        let mut run = LevelRun::start(1, rules.questions_per_level, &rules).unwrap();
        let mut retries_granted = 0;

        for step in steps {
            match step {
                Step::Answer(correct) => {
                    let before = run.clone();
                    match run.submit_answer(correct, &rules) {
                        Ok(next) => {
                            if correct {
                                prop_assert_eq!(next.score, before.score + rules.points_per_correct);
                            } else {
                                prop_assert_eq!(next.score, before.score);
                                prop_assert_eq!(next.lives, before.lives.saturating_sub(1));
                            }
                            run = next;
                        }
                        Err(_) => prop_assert_ne!(before.phase, RunPhase::InProgress),
                    }
                }
                Step::Retry(balance) => {
                    if let Ok(next) = run.apply_retry(balance, &rules) {
                        prop_assert!(balance >= rules.retry_cost);
                        retries_granted += 1;
                        run = next;
                    }
                }
            }
            prop_assert!(run.lives <= rules.starting_lives);
            prop_assert!(retries_granted <= 1);
            prop_assert_eq!(run.score, run.correct * rules.points_per_correct);
        }
    }

    #[test]
    fn prop_unlock_advances_by_exactly_one(
        rules in rules_strategy(),
        level in 1u32..=20,
        frontier_gap in 0u32..=3,
        answers in prop::collection::vec(prop::bool::weighted(0.85), 1..12),
    ) {
        let frontier = level + frontier_gap;
        let mut run = LevelRun::start(level, answers.len(), &rules).unwrap();
        for a in &answers {
            if run.phase != RunPhase::InProgress {
                break;
            }
            run = run.submit_answer(*a, &rules).unwrap();
        }

        if run.phase != RunPhase::Completed {
            prop_assert!(evaluate_finish(&run, frontier, false, &rules).is_err());
            return Ok(());
        }

        match evaluate_finish(&run, frontier, false, &rules).unwrap() {
            FinishDecision::Unlock { next_level, points_awarded } => {
                prop_assert_eq!(next_level, frontier + 1);
                prop_assert_eq!(level, frontier);
                prop_assert!(run.is_perfect());
                prop_assert_eq!(points_awarded, run.score + rules.level_up_bonus);
            }
            FinishDecision::NoUnlock(_) => {
                prop_assert!(level < frontier || !run.is_perfect());
            }
        }
    }
}
