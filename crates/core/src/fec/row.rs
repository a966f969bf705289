//! Parsed FEC rows and the field-level parsing helpers.
//!
//! An FEC export carries one row per debit/credit line. Rows are transient:
//! they exist for the duration of an import run and are discarded after
//! being transformed into candidate journal entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coa::Account;

/// One parsed row of an imported ledger file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FecRow {
    /// 1-based line number in the source file (header is line 1).
    pub line_number: u64,
    /// Journal code the row posts to.
    pub journal_code: String,
    /// Account number the row posts to.
    pub account_number: String,
    /// Account name, when the file carries one.
    pub account_name: Option<String>,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Piece reference shared by the rows of one entry.
    pub reference: Option<String>,
    /// Row label/description.
    pub label: String,
    /// Debit amount (zero when the row is a credit).
    pub debit: Decimal,
    /// Credit amount (zero when the row is a debit).
    pub credit: Decimal,
}

/// Severity of a row- or entry-level import problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Suspicious but importable.
    Warning,
    /// The row or entry cannot be imported as-is.
    Error,
}

/// One row- or entry-level problem found during an import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportIssue {
    /// Problem severity.
    pub severity: Severity,
    /// Source line number, for row-level problems.
    pub line_number: Option<u64>,
    /// Entry key, for entry-level problems.
    pub entry_key: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ImportIssue {
    /// Creates a row-level issue.
    #[must_use]
    pub fn row(severity: Severity, line_number: u64, message: impl Into<String>) -> Self {
        Self {
            severity,
            line_number: Some(line_number),
            entry_key: None,
            message: message.into(),
        }
    }

    /// Creates an entry-level issue.
    #[must_use]
    pub fn entry(severity: Severity, entry_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            line_number: None,
            entry_key: Some(entry_key.into()),
            message: message.into(),
        }
    }

    /// Creates a file-level issue.
    #[must_use]
    pub fn file(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            line_number: None,
            entry_key: None,
            message: message.into(),
        }
    }
}

/// Parses an FEC amount field.
///
/// Accepts the comma decimal separator used by French exports, space and
/// non-breaking-space thousands grouping, and an empty field as zero.
///
/// # Errors
///
/// Returns the offending input when it is not a number.
pub fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }

    cleaned
        .parse::<Decimal>()
        .map_err(|_| format!("'{}' is not a valid amount", raw.trim()))
}

/// Parses an FEC date field.
///
/// Accepts the compact `YYYYMMDD` FEC format, ISO `YYYY-MM-DD`, and the
/// `DD/MM/YYYY` form produced by spreadsheet round-trips.
///
/// # Errors
///
/// Returns the offending input when no format matches.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    for format in ["%Y%m%d", "%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date);
        }
    }
    Err(format!("'{raw}' is not a valid date"))
}

/// Raw field values of one record, before row validation.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// 1-based source line number.
    pub line_number: u64,
    /// Journal code field.
    pub journal_code: String,
    /// Account number field.
    pub account_number: String,
    /// Account name field.
    pub account_name: String,
    /// Date field, unparsed.
    pub entry_date: String,
    /// Reference field.
    pub reference: String,
    /// Label field.
    pub label: String,
    /// Debit field, unparsed.
    pub debit: String,
    /// Credit field, unparsed.
    pub credit: String,
}

impl RawRow {
    /// Validates the raw fields and produces a typed row.
    ///
    /// Every applicable problem is reported; a row with any error-severity
    /// issue yields `None` and the import continues with the next row.
    #[must_use]
    pub fn validate(&self, issues: &mut Vec<ImportIssue>) -> Option<FecRow> {
        let before = issues.len();

        let account_number = self.account_number.trim();
        if account_number.is_empty() {
            issues.push(ImportIssue::row(
                Severity::Error,
                self.line_number,
                "Account number is empty",
            ));
        } else if !Account::is_valid_number(account_number) {
            issues.push(ImportIssue::row(
                Severity::Error,
                self.line_number,
                format!("Account number '{account_number}' is not numeric"),
            ));
        }

        let entry_date = match parse_date(&self.entry_date) {
            Ok(date) => Some(date),
            Err(message) => {
                issues.push(ImportIssue::row(Severity::Error, self.line_number, message));
                None
            }
        };

        let debit = match parse_amount(&self.debit) {
            Ok(amount) => Some(amount),
            Err(message) => {
                issues.push(ImportIssue::row(Severity::Error, self.line_number, message));
                None
            }
        };
        let credit = match parse_amount(&self.credit) {
            Ok(amount) => Some(amount),
            Err(message) => {
                issues.push(ImportIssue::row(Severity::Error, self.line_number, message));
                None
            }
        };

        if let (Some(debit), Some(credit)) = (debit, credit) {
            if debit.is_zero() && credit.is_zero() {
                issues.push(ImportIssue::row(
                    Severity::Error,
                    self.line_number,
                    "Neither debit nor credit is populated",
                ));
            }
        }

        if issues.len() > before {
            return None;
        }

        let reference = self.reference.trim();
        let account_name = self.account_name.trim();
        Some(FecRow {
            line_number: self.line_number,
            journal_code: self.journal_code.trim().to_string(),
            account_number: account_number.to_string(),
            account_name: (!account_name.is_empty()).then(|| account_name.to_string()),
            entry_date: entry_date?,
            reference: (!reference.is_empty()).then(|| reference.to_string()),
            label: self.label.trim().to_string(),
            debit: debit?,
            credit: credit?,
        })
    }
}
