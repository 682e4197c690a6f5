use trivia::domain::FIRST_LEVEL;
use trivia::errors::domain::ValidationKind;
use trivia::repos::profiles;
use trivia::{DomainError, FinishDecision, LevelSession, NoUnlockReason, RunPhase};

use crate::support::interleave::interleaved_app;
use crate::support::seed::{app, one_life_config, seed_profile, seed_questions};

fn answer_all(
    levels: &trivia::LevelService,
    mut session: LevelSession,
    choices: &[usize],
) -> LevelSession {
    for &choice in choices {
        session = levels.answer(&session, choice).expect("answer accepted");
    }
    session
}

#[tokio::test]
async fn perfect_frontier_run_unlocks_next_level() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1, 2], 8).await;
    let uid = state.auth.sign_up("ann@example.com", "hunter22").await.unwrap();

    let session = state.levels.start_level(&uid, FIRST_LEVEL).await.unwrap();
    assert_eq!(session.questions.len(), 5);

    let session = answer_all(&state.levels, session, &[0; 5]);
    assert_eq!(session.run.phase, RunPhase::Completed);
    assert_eq!(session.run.score, 10);

    let decision = state.levels.finish_level(&uid, &session.run).await.unwrap();
    assert_eq!(
        decision,
        FinishDecision::Unlock {
            next_level: 2,
            points_awarded: 20
        }
    );

    let profile = profiles::require_profile(store.as_ref(), &uid).await.unwrap();
    assert_eq!(profile.value.unlocked_level, 2);
    assert_eq!(profile.value.points, 20);
    assert!(profiles::is_level_completed(store.as_ref(), &uid, 1).await.unwrap());

    // Level 2 is now playable.
    state.levels.start_level(&uid, 2).await.unwrap();
}

#[tokio::test]
async fn replaying_a_completed_level_earns_nothing() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 0, 1).await;

    for _ in 0..2 {
        let session = state.levels.start_level("u1", 1).await.unwrap();
        let session = answer_all(&state.levels, session, &[0; 5]);
        state.levels.finish_level("u1", &session.run).await.unwrap();
    }
    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[0; 5]);
    let decision = state.levels.finish_level("u1", &session.run).await.unwrap();
    assert_eq!(
        decision,
        FinishDecision::NoUnlock(NoUnlockReason::AlreadyCompleted)
    );

    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.unlocked_level, 2);
    assert_eq!(profile.value.points, 20);
}

#[tokio::test]
async fn imperfect_run_completes_without_unlock() {
    let mut config = one_life_config();
    config.starting_lives = 3;
    let (store, state) = app(config);
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 0, 1).await;

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[0, 1, 0, 1, 0]);
    assert_eq!(session.run.phase, RunPhase::Completed);
    assert_eq!(session.run.lives, 1);
    assert_eq!(session.run.score, 6);

    let decision = state.levels.finish_level("u1", &session.run).await.unwrap();
    assert_eq!(decision, FinishDecision::NoUnlock(NoUnlockReason::NotPerfect));
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.unlocked_level, 1);
    assert_eq!(profile.value.points, 0);
}

#[tokio::test]
async fn locked_and_unknown_levels_are_refused() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1, 2, 3], 5).await;
    seed_profile(store.as_ref(), "u1", 0, 2).await;

    assert!(matches!(
        state.levels.start_level("u1", 3).await,
        Err(DomainError::Validation(ValidationKind::LevelLocked, _))
    ));
    assert!(matches!(
        state.levels.start_level("u1", 0).await,
        Err(DomainError::Validation(ValidationKind::InvalidLevel, _))
    ));
    assert!(state.levels.start_level("u1", 2).await.is_ok());
}

#[tokio::test]
async fn retry_with_points_resumes_and_still_unlocks() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 25, 1).await;

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[1]);
    assert_eq!(session.run.phase, RunPhase::OutOfLives);

    let run = state.levels.retry_using_points("u1", &session.run).await.unwrap();
    assert_eq!(run.lives, 1);
    assert_eq!(run.phase, RunPhase::InProgress);
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 5);

    let session = LevelSession {
        questions: session.questions,
        run,
    };
    let session = answer_all(&state.levels, session, &[0; 4]);
    assert_eq!(session.run.phase, RunPhase::Completed);
    assert_eq!(session.run.score, 8);

    let decision = state.levels.finish_level("u1", &session.run).await.unwrap();
    assert_eq!(
        decision,
        FinishDecision::Unlock {
            next_level: 2,
            points_awarded: 18
        }
    );
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 23);

    // The retry is spent for this run.
    assert!(matches!(
        state.levels.retry_using_points("u1", &session.run).await,
        Err(DomainError::Validation(ValidationKind::RetryAlreadyUsed, _))
    ));
}

#[tokio::test]
async fn retry_without_enough_points_changes_nothing() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 10, 1).await;

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[1]);

    let err = state
        .levels
        .retry_using_points("u1", &session.run)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DomainError::InsufficientBalance {
            required: 20,
            available: 10
        }
    );
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 10);
}

#[tokio::test]
async fn retrying_the_same_attempt_twice_charges_once() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 100, 1).await;

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[1]);
    assert_eq!(session.run.phase, RunPhase::OutOfLives);

    state.levels.retry_using_points("u1", &session.run).await.unwrap();
    assert!(matches!(
        state.levels.retry_using_points("u1", &session.run).await,
        Err(DomainError::Validation(ValidationKind::RetryAlreadyUsed, _))
    ));
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 80);

    // A new attempt gets its own retry.
    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[1]);
    state.levels.retry_using_points("u1", &session.run).await.unwrap();
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 60);
}

#[tokio::test]
async fn concurrent_retries_of_one_attempt_charge_once() {
    let (store, state) = interleaved_app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 100, 1).await;

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[1]);

    let (first, second) = tokio::join!(
        state.levels.retry_using_points("u1", &session.run),
        state.levels.retry_using_points("u1", &session.run)
    );
    assert_eq!([&first, &second].iter().filter(|r| r.is_ok()).count(), 1);

    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 80);
}

#[tokio::test]
async fn failed_retry_leaves_the_attempt_retryable() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    seed_profile(store.as_ref(), "u1", 100, 1).await;

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[1]);

    // A shortfall must not use up the attempt's retry.
    seed_profile(store.as_ref(), "u1", 5, 1).await;
    assert!(matches!(
        state.levels.retry_using_points("u1", &session.run).await,
        Err(DomainError::InsufficientBalance { .. })
    ));

    seed_profile(store.as_ref(), "u1", 30, 1).await;
    let run = state.levels.retry_using_points("u1", &session.run).await.unwrap();
    assert_eq!(run.phase, RunPhase::InProgress);
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.points, 10);
}

#[tokio::test]
async fn refinishing_restores_a_missing_completion_flag() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 5).await;
    // Frontier moved past level 1 but its completion flag was never written.
    seed_profile(store.as_ref(), "u1", 20, 2).await;
    assert!(!profiles::is_level_completed(store.as_ref(), "u1", 1).await.unwrap());

    let session = state.levels.start_level("u1", 1).await.unwrap();
    let session = answer_all(&state.levels, session, &[0; 5]);
    let decision = state.levels.finish_level("u1", &session.run).await.unwrap();
    assert_eq!(
        decision,
        FinishDecision::NoUnlock(NoUnlockReason::AlreadyCompleted)
    );

    assert!(profiles::is_level_completed(store.as_ref(), "u1", 1).await.unwrap());
    let profile = profiles::require_profile(store.as_ref(), "u1").await.unwrap();
    assert_eq!(profile.value.unlocked_level, 2);
    assert_eq!(profile.value.points, 20);
}
