//! Ledger error types for state and integrity errors.
//!
//! Expected business-rule violations travel as [`ValidationReport`] data,
//! not as errors. `LedgerError` covers the rest: illegal status
//! transitions, and integrity-class failures that indicate a broken
//! invariant elsewhere and must stop the calling workflow.

use thiserror::Error;

use super::validation::ValidationReport;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A proposed entry failed business-rule validation.
    #[error("Entry failed validation with {} issue(s)", report.issues.len())]
    Rejected {
        /// The accumulated violations.
        report: ValidationReport,
    },

    // ========== State Errors ==========
    /// Cannot modify a posted entry; corrections go through a reversing entry.
    #[error("Cannot modify posted entry")]
    CannotModifyPosted,

    /// Cannot modify a cancelled entry.
    #[error("Cannot modify cancelled entry")]
    CannotModifyCancelled,

    /// Can only delete draft entries.
    #[error("Can only delete draft entries")]
    CanOnlyDeleteDraft,

    /// Only draft entries can be posted.
    #[error("Entry is already posted")]
    AlreadyPosted,

    // ========== Integrity Errors ==========
    /// Two posted entries ended up with the same number: the numbering
    /// invariant is broken upstream.
    #[error("Duplicate entry number {number} in journal {journal_code}")]
    DuplicateEntryNumber {
        /// The colliding number.
        number: String,
        /// The journal the collision happened in.
        journal_code: String,
    },

    /// Number allocation lost a race; the posting was aborted whole and
    /// may be retried.
    #[error("Entry number allocation conflict for journal {0}, please retry")]
    SequenceConflict(String),
}

impl LedgerError {
    /// Returns the stable error code for operator-facing output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "VALIDATION_FAILED",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::CannotModifyCancelled => "CANNOT_MODIFY_CANCELLED",
            Self::CanOnlyDeleteDraft => "CAN_ONLY_DELETE_DRAFT",
            Self::AlreadyPosted => "ALREADY_POSTED",
            Self::DuplicateEntryNumber { .. } => "DUPLICATE_ENTRY_NUMBER",
            Self::SequenceConflict(_) => "SEQUENCE_CONFLICT",
        }
    }

    /// Returns true for integrity-class errors that indicate a broken
    /// invariant rather than bad input.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::DuplicateEntryNumber { .. } | Self::SequenceConflict(_)
        )
    }

    /// Returns true if the failed operation may be retried as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::SequenceConflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::Rejected {
                report: ValidationReport::default()
            }
            .error_code(),
            "VALIDATION_FAILED"
        );
        assert_eq!(LedgerError::AlreadyPosted.error_code(), "ALREADY_POSTED");
        assert_eq!(
            LedgerError::SequenceConflict("VE".into()).error_code(),
            "SEQUENCE_CONFLICT"
        );
    }

    #[test]
    fn test_integrity_classification() {
        assert!(
            LedgerError::DuplicateEntryNumber {
                number: "VE-2026-000001".into(),
                journal_code: "VE".into(),
            }
            .is_integrity()
        );
        assert!(LedgerError::SequenceConflict("VE".into()).is_integrity());
        assert!(!LedgerError::CannotModifyPosted.is_integrity());
    }

    #[test]
    fn test_only_sequence_conflict_is_retryable() {
        assert!(LedgerError::SequenceConflict("BQ".into()).is_retryable());
        assert!(
            !LedgerError::DuplicateEntryNumber {
                number: "BQ-2026-000007".into(),
                journal_code: "BQ".into(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::DuplicateEntryNumber {
            number: "VE-2026-000042".into(),
            journal_code: "VE".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate entry number VE-2026-000042 in journal VE"
        );
    }
}
