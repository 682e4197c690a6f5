//! Error codes for the trivia core.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and are the strings a UI shell sees.

use core::fmt;

/// Centralized error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation
    /// Malformed document path
    InvalidPath,
    /// Question set is empty or a question lacks exactly one correct answer
    InvalidQuestionSet,
    /// Level id out of range
    InvalidLevel,
    /// Level is above the user's unlock frontier
    LevelLocked,
    /// Operation not allowed in the current phase/status
    PhaseMismatch,
    /// Retry already consumed for this level attempt
    RetryAlreadyUsed,
    /// Player already answered the current match question
    AlreadyAnswered,
    /// User is not one of the match's players
    NotAMatchPlayer,
    /// Player tried to join their own match
    SelfJoin,
    /// Invalid email address
    InvalidEmail,
    /// Password too short
    WeakPassword,
    /// Email/password mismatch
    InvalidCredentials,
    /// General validation error
    ValidationError,

    // Balance
    /// Not enough points
    InsufficientBalance,

    // Resource Not Found
    UserNotFound,
    MatchNotFound,
    ItemNotFound,
    QuestionsNotFound,
    DocumentNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Document changed between read and write
    OptimisticLock,
    /// Item already purchased
    AlreadyOwned,
    /// Match is no longer waiting for a second player
    MatchNotJoinable,
    /// Email already registered
    EmailTaken,
    /// Generic conflict (fallback)
    Conflict,

    // System Errors
    /// Document store unreachable
    StoreUnavailable,
    Timeout,
    DataCorruption,
    InternalError,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPath => "INVALID_PATH",
            Self::InvalidQuestionSet => "INVALID_QUESTION_SET",
            Self::InvalidLevel => "INVALID_LEVEL",
            Self::LevelLocked => "LEVEL_LOCKED",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::RetryAlreadyUsed => "RETRY_ALREADY_USED",
            Self::AlreadyAnswered => "ALREADY_ANSWERED",
            Self::NotAMatchPlayer => "NOT_A_MATCH_PLAYER",
            Self::SelfJoin => "SELF_JOIN",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::ValidationError => "VALIDATION_ERROR",

            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::QuestionsNotFound => "QUESTIONS_NOT_FOUND",
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::AlreadyOwned => "ALREADY_OWNED",
            Self::MatchNotJoinable => "MATCH_NOT_JOINABLE",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::Timeout => "TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
