//! Aged receivables and payables.
//!
//! Open (posted, not yet reconciled) customer and supplier entries are
//! bucketed by days outstanding at a reference date into the fixed bands
//! 0-30, 31-60, 61-90, and 90+.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use grandlivre_shared::types::EntryId;

use super::types::ReportType;

/// Which side of the third-party accounts is aged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeingKind {
    /// Customer balances (accounts `41*`).
    Receivables,
    /// Supplier balances (accounts `40*`).
    Payables,
}

impl AgeingKind {
    /// Account-number prefix selecting the aged accounts.
    #[must_use]
    pub const fn account_prefix(self) -> &'static str {
        match self {
            Self::Receivables => "41",
            Self::Payables => "40",
        }
    }

    /// The matching report type.
    #[must_use]
    pub const fn report_type(self) -> ReportType {
        match self {
            Self::Receivables => ReportType::AgedReceivables,
            Self::Payables => ReportType::AgedPayables,
        }
    }

    /// Outstanding amount of one line, oriented so open items are positive.
    #[must_use]
    pub fn outstanding(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Receivables => debit - credit,
            Self::Payables => credit - debit,
        }
    }
}

/// One ageing band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeingBand {
    /// Display label.
    pub label: &'static str,
    /// Inclusive lower bound in days.
    pub min_days: i64,
    /// Inclusive upper bound in days; `None` for the open-ended band.
    pub max_days: Option<i64>,
}

/// The fixed ageing bands.
pub const BANDS: [AgeingBand; 4] = [
    AgeingBand {
        label: "0-30",
        min_days: 0,
        max_days: Some(30),
    },
    AgeingBand {
        label: "31-60",
        min_days: 31,
        max_days: Some(60),
    },
    AgeingBand {
        label: "61-90",
        min_days: 61,
        max_days: Some(90),
    },
    AgeingBand {
        label: "90+",
        min_days: 91,
        max_days: None,
    },
];

/// Returns the band index for a number of days outstanding.
///
/// Items not yet due land in the first band.
#[must_use]
pub fn band_index(days_outstanding: i64) -> usize {
    let days = days_outstanding.max(0);
    BANDS
        .iter()
        .position(|band| band.max_days.is_none_or(|max| days <= max))
        .unwrap_or(BANDS.len() - 1)
}

/// One open entry with its ageing information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgedEntry {
    /// The open entry.
    pub entry_id: EntryId,
    /// Account number the balance sits on.
    pub account_number: String,
    /// Account name.
    pub account_name: String,
    /// Entry reference.
    pub reference: Option<String>,
    /// Due date used for ageing (entry date when no due date is known).
    pub due_date: NaiveDate,
    /// Days outstanding at the reference date (zero when not yet due).
    pub days_outstanding: i64,
    /// Outstanding amount.
    pub outstanding: Decimal,
    /// Index into [`BANDS`].
    pub band: usize,
}

/// Aged receivables or payables report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeingReport {
    /// Receivables or payables.
    pub kind: AgeingKind,
    /// Reference date the ages are computed against.
    pub as_of: NaiveDate,
    /// Open entries, ordered by account number then due date.
    pub entries: Vec<AgedEntry>,
    /// Outstanding total per band, aligned with [`BANDS`].
    pub band_totals: [Decimal; 4],
    /// Grand total outstanding.
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(-5, 0)]
    #[case(0, 0)]
    #[case(30, 0)]
    #[case(31, 1)]
    #[case(60, 1)]
    #[case(61, 2)]
    #[case(90, 2)]
    #[case(91, 3)]
    #[case(400, 3)]
    fn test_band_index(#[case] days: i64, #[case] expected: usize) {
        assert_eq!(band_index(days), expected);
    }

    #[test]
    fn test_outstanding_orientation() {
        // A customer invoice is a debit on 411; a supplier bill is a
        // credit on 401. Both read positive as open amounts.
        assert_eq!(
            AgeingKind::Receivables.outstanding(dec!(120), dec!(20)),
            dec!(100)
        );
        assert_eq!(
            AgeingKind::Payables.outstanding(dec!(0), dec!(80)),
            dec!(80)
        );
    }

    #[test]
    fn test_kind_prefixes() {
        assert_eq!(AgeingKind::Receivables.account_prefix(), "41");
        assert_eq!(AgeingKind::Payables.account_prefix(), "40");
        assert_eq!(
            AgeingKind::Receivables.report_type(),
            ReportType::AgedReceivables
        );
    }
}
