//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use grandlivre_shared::types::{AccountId, CompanyId, EntryId, ReportId, UserId};

use crate::coa::Classification;
use crate::ledger::entry::EntryStatus;

/// Report type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Trial balance.
    TrialBalance,
    /// Balance sheet.
    BalanceSheet,
    /// Income statement.
    IncomeStatement,
    /// VAT summary.
    VatSummary,
    /// Aged receivables.
    AgedReceivables,
    /// Aged payables.
    AgedPayables,
}

impl ReportType {
    /// Returns the type as its wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrialBalance => "trial_balance",
            Self::BalanceSheet => "balance_sheet",
            Self::IncomeStatement => "income_statement",
            Self::VatSummary => "vat_summary",
            Self::AgedReceivables => "aged_receivables",
            Self::AgedPayables => "aged_payables",
        }
    }
}

impl std::str::FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trial_balance" => Ok(Self::TrialBalance),
            "balance_sheet" => Ok(Self::BalanceSheet),
            "income_statement" => Ok(Self::IncomeStatement),
            "vat_summary" => Ok(Self::VatSummary),
            "aged_receivables" => Ok(Self::AgedReceivables),
            "aged_payables" => Ok(Self::AgedPayables),
            other => Err(format!("Unknown report type: {other}")),
        }
    }
}

/// One posted ledger line flattened with its entry metadata.
///
/// This is the engine's only read-side input; the persistence layer
/// produces it for a company and period, and the engine never queries
/// anything itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostedLine {
    /// The entry this line belongs to.
    pub entry_id: EntryId,
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Due date of the entry, when known.
    pub due_date: Option<NaiveDate>,
    /// Entry reference.
    pub reference: Option<String>,
    /// Entry status (posted or reconciled).
    pub status: EntryStatus,
    /// The account the line posts to.
    pub account_id: AccountId,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// A derived report line: never persisted as primary data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLine {
    /// Account number.
    pub account_number: String,
    /// Account name.
    pub account_name: String,
    /// Line amount.
    pub amount: Decimal,
    /// PCG classification of the account.
    pub classification: Classification,
}

/// Per-account debit/credit aggregate over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountAggregate {
    /// Account number.
    pub account_number: String,
    /// Account name.
    pub account_name: String,
    /// Summed debits.
    pub total_debit: Decimal,
    /// Summed credits.
    pub total_credit: Decimal,
}

impl AccountAggregate {
    /// Raw debit-minus-credit balance.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Trial balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Per-account rows, ordered by account number.
    pub rows: Vec<AccountAggregate>,
    /// Period-wide debit total.
    pub total_debit: Decimal,
    /// Period-wide credit total.
    pub total_credit: Decimal,
}

/// Outcome of a report request.
///
/// A period with no posted entries is a legitimate state, not an error:
/// callers render "no data for this period" from `Empty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "report")]
pub enum ReportOutcome<T> {
    /// No reportable lines in the period.
    Empty,
    /// The generated report.
    Ready(T),
}

impl<T> ReportOutcome<T> {
    /// Returns true for the empty-period signal.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the report, if one was generated.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(report) => Some(report),
            Self::Empty => None,
        }
    }
}

/// VAT summary over a period.
///
/// Derived with the same prefix rules as the classifier: collected VAT
/// sits on `4457*`, deductible VAT on `4456*`, the turnover base is
/// class 7.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatReport {
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// VAT collected on sales.
    pub collected: Decimal,
    /// VAT deductible on purchases.
    pub deductible: Decimal,
    /// Net position (positive means VAT payable).
    pub net: Decimal,
    /// Class 7 turnover the collected VAT relates to.
    pub turnover_base: Decimal,
}

/// Lifecycle status of a generated report artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Generation in progress.
    Pending,
    /// Rendered and stored.
    Completed,
    /// Generation failed.
    Failed,
}

/// Metadata of a rendered report artifact.
///
/// The engine supplies report data only; an external renderer produces the
/// file and this record is persisted alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    /// Unique identifier.
    pub id: ReportId,
    /// Company the report was generated for.
    pub company_id: CompanyId,
    /// Report type.
    pub report_type: ReportType,
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Rendered file format (e.g. "csv", "pdf").
    pub file_format: String,
    /// User who requested the report.
    pub generated_by: UserId,
    /// Artifact status.
    pub status: ReportStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_type_strings() {
        assert_eq!(ReportType::TrialBalance.as_str(), "trial_balance");
        assert_eq!(ReportType::AgedReceivables.as_str(), "aged_receivables");
    }

    #[test]
    fn test_aggregate_balance() {
        let aggregate = AccountAggregate {
            account_number: "411000".to_string(),
            account_name: "Customers".to_string(),
            total_debit: dec!(150),
            total_credit: dec!(30),
        };
        assert_eq!(aggregate.balance(), dec!(120));
    }

    #[test]
    fn test_outcome_accessors() {
        let empty: ReportOutcome<TrialBalance> = ReportOutcome::Empty;
        assert!(empty.is_empty());
        assert!(empty.ready().is_none());
    }
}
