use trivia::errors::domain::{ConflictKind, ValidationKind};
use trivia::repos::profiles;
use trivia::DomainError;
use trivia_test_support::unique_email;

use crate::support::seed::{app, one_life_config};

#[tokio::test]
async fn sign_up_creates_a_level_one_profile() {
    let (store, state) = app(one_life_config());
    let email = unique_email("ann");
    let uid = state.auth.sign_up(&email, "hunter22").await.unwrap();

    assert_eq!(state.auth.current_user(), Some(uid.clone()));
    let profile = profiles::require_profile(store.as_ref(), &uid).await.unwrap();
    assert_eq!(profile.value.unlocked_level, 1);
    assert_eq!(profile.value.points, 0);
}

#[tokio::test]
async fn accounts_are_keyed_by_normalized_email() {
    let (_store, state) = app(one_life_config());
    let uid = state
        .auth
        .sign_up("Player.One@Example.com", "hunter22")
        .await
        .unwrap();
    state.auth.sign_out();

    assert!(matches!(
        state.auth.sign_up("player.one@example.com ", "other-pass").await,
        Err(DomainError::Conflict(ConflictKind::EmailTaken, _))
    ));
    assert_eq!(
        state
            .auth
            .sign_in("PLAYER.ONE@example.com", "hunter22")
            .await
            .unwrap(),
        uid
    );
    assert!(matches!(
        state.auth.sign_in("player.one@example.com", "nope-nope").await,
        Err(DomainError::Validation(ValidationKind::InvalidCredentials, _))
    ));
}
