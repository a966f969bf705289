//! Report error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Period-wide debits and credits disagree across posted entries.
    ///
    /// Every posted entry balances individually, so a mismatch here means
    /// the ledger itself is corrupt. This is an integrity error and must
    /// stop the calling workflow, never render as a silent zero.
    #[error(
        "Trial balance mismatch: posted debits {total_debit} != credits {total_credit}"
    )]
    TrialBalanceMismatch {
        /// Period-wide debit total.
        total_debit: Decimal,
        /// Period-wide credit total.
        total_credit: Decimal,
    },

    /// A template line item references an unknown line id.
    #[error("Report template references unknown line item '{0}'")]
    UnknownLineReference(String),
}

impl ReportError {
    /// Returns true for integrity-class errors.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::TrialBalanceMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trial_balance_mismatch_is_integrity() {
        let err = ReportError::TrialBalanceMismatch {
            total_debit: dec!(100),
            total_credit: dec!(90),
        };
        assert!(err.is_integrity());
        assert_eq!(
            err.to_string(),
            "Trial balance mismatch: posted debits 100 != credits 90"
        );
    }

    #[test]
    fn test_date_range_is_not_integrity() {
        let err = ReportError::InvalidDateRange {
            start: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };
        assert!(!err.is_integrity());
    }
}
