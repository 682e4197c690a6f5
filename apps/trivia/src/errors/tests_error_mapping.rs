// Unit tests for error mapping - pure domain logic without store dependencies
use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_codes() {
    let de = DomainError::validation(ValidationKind::LevelLocked, "level 4 locked");
    assert_eq!(de.code(), ErrorCode::LevelLocked);

    let other = DomainError::validation(ValidationKind::Other("X".into()), "bad");
    assert_eq!(other.code(), ErrorCode::ValidationError);
}

#[test]
fn maps_conflicts() {
    let lock = DomainError::conflict(ConflictKind::OptimisticLock, "stale");
    assert_eq!(lock.code().as_str(), "OPTIMISTIC_LOCK");
    assert!(lock.is_optimistic_lock());

    let owned = DomainError::conflict(ConflictKind::AlreadyOwned, "owned");
    assert_eq!(owned.code().as_str(), "ALREADY_OWNED");
    assert!(!owned.is_optimistic_lock());

    let other = DomainError::conflict(ConflictKind::Other("x".into()), "generic");
    assert_eq!(other.code().as_str(), "CONFLICT");
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::Match, "no match");
    assert_eq!(nf.code().as_str(), "MATCH_NOT_FOUND");
}

#[test]
fn maps_infra() {
    let down = DomainError::infra(InfraErrorKind::Unavailable, "offline");
    assert_eq!(down.code(), ErrorCode::StoreUnavailable);
    assert!(down.is_unavailable());

    let corr = DomainError::infra(InfraErrorKind::DataCorruption, "bad json");
    assert_eq!(corr.code(), ErrorCode::DataCorruption);
    assert!(!corr.is_unavailable());
}

#[test]
fn insufficient_balance_reports_amounts() {
    let e = DomainError::insufficient_balance(20, 5);
    assert_eq!(e.code(), ErrorCode::InsufficientBalance);
    assert_eq!(
        e.to_string(),
        "insufficient balance: 20 points required, 5 available"
    );
}

#[test]
fn app_error_preserves_domain_code() {
    let app: AppError = DomainError::not_found(NotFoundKind::Item, "gone").into();
    assert_eq!(app.code(), ErrorCode::ItemNotFound);

    let cfg = AppError::config("TRIVIA_STARTING_LIVES must be positive".to_string());
    assert_eq!(cfg.code(), ErrorCode::ConfigError);
}
