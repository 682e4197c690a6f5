//! Domain-level error type used across services, repos and adapters.
//!
//! This error type is store- and UI-agnostic. Callers that need a stable
//! machine-readable identifier use [`DomainError::code`].

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    /// The document store (or another remote collaborator) cannot be reached.
    Unavailable,
    /// A stored document could not be decoded into its domain shape.
    DataCorruption,
    Other(String),
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    User,
    Match,
    Item,
    Questions,
    Document,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Document version moved between read and write.
    OptimisticLock,
    AlreadyOwned,
    MatchNotJoinable,
    EmailTaken,
    Other(String),
}

/// Validation and business-rule violations
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    InvalidPath,
    InvalidQuestionSet,
    InvalidLevel,
    LevelLocked,
    PhaseMismatch,
    RetryAlreadyUsed,
    AlreadyAnswered,
    NotAMatchPlayer,
    SelfJoin,
    InvalidEmail,
    WeakPassword,
    InvalidCredentials,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or business rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(InfraErrorKind, String),
    /// Point balance too low for a purchase or a retry. Nothing was charged.
    InsufficientBalance { required: u32, available: u32 },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation error {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
            DomainError::InsufficientBalance {
                required,
                available,
            } => write!(
                f,
                "insufficient balance: {required} points required, {available} available"
            ),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }
    pub fn insufficient_balance(required: u32, available: u32) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    /// True for a lost compare-and-set race, which callers may retry.
    pub fn is_optimistic_lock(&self) -> bool {
        matches!(self, DomainError::Conflict(ConflictKind::OptimisticLock, _))
    }

    /// True when the store could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DomainError::Infra(InfraErrorKind::Unavailable | InfraErrorKind::Timeout, _)
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::InvalidPath => ErrorCode::InvalidPath,
                ValidationKind::InvalidQuestionSet => ErrorCode::InvalidQuestionSet,
                ValidationKind::InvalidLevel => ErrorCode::InvalidLevel,
                ValidationKind::LevelLocked => ErrorCode::LevelLocked,
                ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
                ValidationKind::RetryAlreadyUsed => ErrorCode::RetryAlreadyUsed,
                ValidationKind::AlreadyAnswered => ErrorCode::AlreadyAnswered,
                ValidationKind::NotAMatchPlayer => ErrorCode::NotAMatchPlayer,
                ValidationKind::SelfJoin => ErrorCode::SelfJoin,
                ValidationKind::InvalidEmail => ErrorCode::InvalidEmail,
                ValidationKind::WeakPassword => ErrorCode::WeakPassword,
                ValidationKind::InvalidCredentials => ErrorCode::InvalidCredentials,
                ValidationKind::Other(_) => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                ConflictKind::AlreadyOwned => ErrorCode::AlreadyOwned,
                ConflictKind::MatchNotJoinable => ErrorCode::MatchNotJoinable,
                ConflictKind::EmailTaken => ErrorCode::EmailTaken,
                ConflictKind::Other(_) => ErrorCode::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::User => ErrorCode::UserNotFound,
                NotFoundKind::Match => ErrorCode::MatchNotFound,
                NotFoundKind::Item => ErrorCode::ItemNotFound,
                NotFoundKind::Questions => ErrorCode::QuestionsNotFound,
                NotFoundKind::Document => ErrorCode::DocumentNotFound,
                NotFoundKind::Other(_) => ErrorCode::NotFound,
            },
            DomainError::Infra(kind, _) => match kind {
                InfraErrorKind::Timeout => ErrorCode::Timeout,
                InfraErrorKind::Unavailable => ErrorCode::StoreUnavailable,
                InfraErrorKind::DataCorruption => ErrorCode::DataCorruption,
                InfraErrorKind::Other(_) => ErrorCode::InternalError,
            },
            DomainError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("document decode failed: {e}"),
        )
    }
}
