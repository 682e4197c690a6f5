use thiserror::Error;

use crate::errors::{DomainError, ErrorCode};

/// Top-level error for bootstrap and host-facing entry points.
///
/// Services return [`DomainError`]; this wraps it alongside the failures that
/// only happen while wiring the core together (configuration).
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    /// Helper method to extract error code from any error variant
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Domain(e) => e.code(),
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}
