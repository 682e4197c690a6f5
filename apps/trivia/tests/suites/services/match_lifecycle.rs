use std::time::Duration;

use trivia::repos::profiles;
use trivia::{MatchEvent, MatchOutcome, MatchStatus};

use crate::support::seed::{app, one_life_config, seed_questions};

#[tokio::test]
async fn two_players_play_a_match_to_a_win() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 6).await;

    let alice = state.auth.sign_up("alice@example.com", "hunter22").await.unwrap();
    let bob = state.auth.sign_up("bob@example.com", "hunter22").await.unwrap();

    let id = state.matches.create_match(&alice, 1).await.unwrap();
    let mut alice_view = state.matches.observe(&id).unwrap();
    let first = alice_view.next().await.unwrap();
    assert_eq!(first.snapshot.value.questions.len(), 3);

    assert_eq!(state.matches.join_match(&bob, 1).await.unwrap(), Some(id.clone()));
    let mut bob_view = state.matches.observe(&id).unwrap();

    let started = alice_view.next().await.unwrap();
    assert!(started.events.contains(&MatchEvent::MatchStarted));

    for (a, b) in [(true, false), (true, true), (false, false)] {
        state.matches.submit_answer(&id, &alice, a).await.unwrap();
        state.matches.submit_answer(&id, &bob, b).await.unwrap();
    }

    let timeout = Duration::from_secs(1);
    let alice_final = tokio::time::timeout(timeout, alice_view.wait_finished())
        .await
        .unwrap()
        .unwrap();
    let bob_final = tokio::time::timeout(timeout, bob_view.wait_finished())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice_final.version, bob_final.version);
    assert_eq!(alice_final.value.player1.score, 4);
    assert_eq!(alice_final.value.player2.as_ref().unwrap().score, 2);

    let outcome = state.matches.settle(&id, &alice).await.unwrap();
    assert_eq!(outcome, Some(MatchOutcome::Winner(alice.clone())));
    assert_eq!(
        state.matches.settle(&id, &bob).await.unwrap(),
        Some(MatchOutcome::Winner(alice.clone()))
    );

    assert!(profiles::is_level_completed(store.as_ref(), &alice, 1).await.unwrap());
    assert!(!profiles::is_level_completed(store.as_ref(), &bob, 1).await.unwrap());
    // A match win does not move the frontier.
    let profile = profiles::require_profile(store.as_ref(), &alice).await.unwrap();
    assert_eq!(profile.value.unlocked_level, 1);
}

#[tokio::test]
async fn concurrent_answers_are_both_recorded() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 3).await;

    let id = state.matches.create_match("alice", 1).await.unwrap();
    state.matches.join_match("bob", 1).await.unwrap();

    for _ in 0..3 {
        let (a, b) = tokio::join!(
            state.matches.submit_answer(&id, "alice", true),
            state.matches.submit_answer(&id, "bob", true),
        );
        a.unwrap();
        b.unwrap();
    }

    let finished = state.matches.load(&id).await.unwrap().value;
    assert_eq!(finished.status, MatchStatus::Finished);
    assert_eq!(finished.player1.score, 6);
    assert_eq!(finished.player2.unwrap().score, 6);
    assert_eq!(
        state.matches.settle(&id, "alice").await.unwrap(),
        Some(MatchOutcome::Draw)
    );
    assert!(!profiles::is_level_completed(store.as_ref(), "alice", 1).await.unwrap());
}

#[tokio::test]
async fn join_without_waiting_match_returns_none() {
    let (store, state) = app(one_life_config());
    seed_questions(store.as_ref(), &[1], 3).await;
    assert_eq!(state.matches.join_match("bob", 1).await.unwrap(), None);

    state.matches.create_match("bob", 1).await.unwrap();
    assert_eq!(state.matches.join_match("bob", 1).await.unwrap(), None);
}
