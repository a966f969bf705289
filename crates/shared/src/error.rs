//! Application-wide error types.
//!
//! The taxonomy distinguishes expected, user-correctable failures
//! (`Validation`, `Input`) from system-level invariant breaches
//! (`Integrity`), which are always fatal to the operation that hit them.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Business-rule validation failure (expected, user-correctable).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed input file or payload (expected, user-correctable).
    #[error("Input error: {0}")]
    Input(String),

    /// Broken ledger invariant (unexpected, system-level).
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Conflict (e.g., duplicate entry number).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the stable error code for operator-facing output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Input(_) => "INPUT_ERROR",
            Self::Integrity(_) => "INTEGRITY_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the error is recoverable by fixing user input.
    ///
    /// Recoverable errors are accumulated into summaries; everything else
    /// stops the calling workflow.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Input(_))
    }
}
