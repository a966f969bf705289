//! Business rule validation for proposed journal entries.
//!
//! Validation is pure and accumulating: every applicable violation is
//! collected into one report so the caller can show a single consolidated
//! message. Expected business-rule violations are data, never panics;
//! posting (status transition, numbering) happens elsewhere and only if
//! the report is clean.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coa::AccountSnapshot;

use super::entry::DraftEntry;

/// Stable code identifying a validation rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// Fewer than two lines: a single-line entry cannot balance.
    InsufficientLines,
    /// Line references an account the company does not have.
    UnknownAccount,
    /// Line references another company's account.
    CrossCompanyAccount,
    /// Entry references a journal code the company does not have
    /// (reported by the import pipeline, which resolves journal codes).
    UnknownJournal,
    /// Line references a deactivated account.
    InactiveAccount,
    /// Line references a heading account that does not accept postings.
    NotPostable,
    /// Line has both a debit and a credit amount.
    BothSidesSet,
    /// Line has a negative debit or credit amount.
    NegativeAmount,
    /// Line has neither a debit nor a credit amount.
    EmptyLine,
    /// Entry debits and credits do not balance.
    Unbalanced,
    /// Entry date falls outside an open accounting period.
    PeriodClosed,
}

impl IssueCode {
    /// Returns the code as its wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnknownAccount => "UNKNOWN_ACCOUNT",
            Self::CrossCompanyAccount => "CROSS_COMPANY_ACCOUNT",
            Self::UnknownJournal => "UNKNOWN_JOURNAL",
            Self::InactiveAccount => "INACTIVE_ACCOUNT",
            Self::NotPostable => "NOT_POSTABLE",
            Self::BothSidesSet => "BOTH_SIDES_SET",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::EmptyLine => "EMPTY_LINE",
            Self::Unbalanced => "UNBALANCED",
            Self::PeriodClosed => "PERIOD_CLOSED",
        }
    }
}

/// One validation rule violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The field the violation is anchored to (e.g. `lines[2].debit`).
    pub field: String,
    /// Stable violation code.
    pub code: IssueCode,
    /// Human-readable message.
    pub message: String,
}

/// Outcome of validating one proposed entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Every violation found, in rule order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true if no violations were found.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if the report contains the given code.
    #[must_use]
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }

    fn push(&mut self, field: impl Into<String>, code: IssueCode, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            field: field.into(),
            code,
            message: message.into(),
        });
    }
}

/// Validates a proposed entry against the company's account snapshot.
///
/// Checks, in order, accumulating every applicable violation:
/// 1. at least two lines
/// 2. every line references an existing, active, postable account of the
///    entry's company (cross-tenant references are a hard error)
/// 3. every line has exactly one strictly positive side, no negatives
/// 4. total debits equal total credits exactly (decimal comparison)
/// 5. the entry date falls within an open period (`period_open` is the
///    caller-supplied verdict; period bookkeeping is not this crate's job)
///
/// # Panics
///
/// Panics only on programmer error: an entry with a nil company id.
#[must_use]
pub fn validate_entry(
    entry: &DraftEntry,
    accounts: &AccountSnapshot,
    period_open: bool,
) -> ValidationReport {
    assert!(
        entry.company_id.into_inner() != Uuid::nil(),
        "DraftEntry without a company id is a programmer error"
    );

    let mut report = ValidationReport::default();

    // 1. Minimum lines.
    if entry.lines.len() < 2 {
        report.push(
            "lines",
            IssueCode::InsufficientLines,
            format!(
                "Entry has {} line(s); a balanced entry needs at least 2",
                entry.lines.len()
            ),
        );
    }

    // 2. Account references.
    for (idx, line) in entry.lines.iter().enumerate() {
        let field = format!("lines[{idx}].account_id");
        match accounts.get(line.account_id) {
            None => {
                report.push(
                    field,
                    IssueCode::UnknownAccount,
                    format!("Account {} does not exist", line.account_id),
                );
            }
            Some(account) if account.company_id != entry.company_id => {
                report.push(
                    field,
                    IssueCode::CrossCompanyAccount,
                    format!(
                        "Account {} belongs to another company",
                        account.number
                    ),
                );
            }
            Some(account) if !account.is_active => {
                report.push(
                    field,
                    IssueCode::InactiveAccount,
                    format!("Account {} is deactivated", account.number),
                );
            }
            Some(account) if !account.is_detail_account => {
                report.push(
                    field,
                    IssueCode::NotPostable,
                    format!("Account {} is a heading and cannot be posted to", account.number),
                );
            }
            Some(_) => {}
        }
    }

    // 3. Exactly one positive side per line.
    for (idx, line) in entry.lines.iter().enumerate() {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            report.push(
                format!("lines[{idx}]"),
                IssueCode::NegativeAmount,
                "Debit and credit amounts must not be negative",
            );
            continue;
        }
        match (line.debit > Decimal::ZERO, line.credit > Decimal::ZERO) {
            (true, true) => report.push(
                format!("lines[{idx}]"),
                IssueCode::BothSidesSet,
                "A line is either a debit or a credit, never both",
            ),
            (false, false) => report.push(
                format!("lines[{idx}]"),
                IssueCode::EmptyLine,
                "A line must carry a debit or a credit amount",
            ),
            _ => {}
        }
    }

    // 4. Balance, exact decimal comparison.
    let totals = entry.totals();
    if !totals.is_balanced() {
        report.push(
            "lines",
            IssueCode::Unbalanced,
            format!(
                "Entry is unbalanced: debits {} != credits {} (difference {})",
                totals.total_debit,
                totals.total_credit,
                totals.difference()
            ),
        );
    }

    // 5. Open period.
    if !period_open {
        report.push(
            "entry_date",
            IssueCode::PeriodClosed,
            format!("No open accounting period for {}", entry.entry_date),
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::coa::account::{Account, AccountType};
    use grandlivre_shared::types::{AccountId, CompanyId, JournalId};

    use crate::ledger::entry::DraftLine;

    struct Fixture {
        company_id: CompanyId,
        snapshot: AccountSnapshot,
        expense_id: AccountId,
        bank_id: AccountId,
    }

    fn fixture() -> Fixture {
        let company_id = CompanyId::new();
        let expense = Account {
            id: AccountId::new(),
            company_id,
            number: "601000".to_string(),
            name: "Purchases of raw materials".to_string(),
            account_type: AccountType::Expense,
            is_active: true,
            is_detail_account: true,
        };
        let bank = Account {
            id: AccountId::new(),
            company_id,
            number: "512000".to_string(),
            name: "Bank".to_string(),
            account_type: AccountType::Asset,
            is_active: true,
            is_detail_account: true,
        };
        let expense_id = expense.id;
        let bank_id = bank.id;
        Fixture {
            company_id,
            snapshot: AccountSnapshot::new(company_id, vec![expense, bank]),
            expense_id,
            bank_id,
        }
    }

    fn line(account_id: AccountId, debit: Decimal, credit: Decimal) -> DraftLine {
        DraftLine {
            account_id,
            debit,
            credit,
            description: None,
            currency: "EUR".to_string(),
        }
    }

    fn draft(fixture: &Fixture, lines: Vec<DraftLine>) -> DraftEntry {
        DraftEntry {
            company_id: fixture.company_id,
            journal_id: JournalId::new(),
            entry_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            due_date: None,
            description: "Test entry".to_string(),
            reference: None,
            lines,
        }
    }

    #[test]
    fn test_valid_entry_passes() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(100)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, true);
        assert!(report.is_ok(), "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn test_unbalanced_entry_reports_delta() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(90)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, true);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].code, IssueCode::Unbalanced);
        assert!(report.issues[0].message.contains("difference 10"));
    }

    #[test]
    fn test_single_line_entry() {
        let f = fixture();
        let entry = draft(&f, vec![line(f.expense_id, dec!(100), dec!(0))]);

        let report = validate_entry(&entry, &f.snapshot, true);
        assert!(report.has_code(IssueCode::InsufficientLines));
        // The balance violation is reported as well, not just the first rule.
        assert!(report.has_code(IssueCode::Unbalanced));
    }

    #[test]
    fn test_unknown_account() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(AccountId::new(), dec!(100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(100)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, true);
        assert!(report.has_code(IssueCode::UnknownAccount));
        assert_eq!(report.issues[0].field, "lines[0].account_id");
    }

    #[test]
    fn test_cross_company_account_is_hard_error() {
        let f = fixture();
        let foreign = Account {
            id: AccountId::new(),
            company_id: CompanyId::new(),
            number: "601000".to_string(),
            name: "Foreign".to_string(),
            account_type: AccountType::Expense,
            is_active: true,
            is_detail_account: true,
        };
        let foreign_id = foreign.id;
        let snapshot = AccountSnapshot::new(
            f.company_id,
            vec![foreign, f.snapshot.get(f.bank_id).unwrap().clone()],
        );

        let entry = draft(
            &f,
            vec![
                line(foreign_id, dec!(100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(100)),
            ],
        );

        let report = validate_entry(&entry, &snapshot, true);
        assert!(report.has_code(IssueCode::CrossCompanyAccount));
    }

    #[test]
    fn test_inactive_account() {
        let f = fixture();
        let mut inactive = f.snapshot.get(f.expense_id).unwrap().clone();
        inactive.is_active = false;
        let snapshot = AccountSnapshot::new(
            f.company_id,
            vec![inactive, f.snapshot.get(f.bank_id).unwrap().clone()],
        );

        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(100)),
            ],
        );

        let report = validate_entry(&entry, &snapshot, true);
        assert!(report.has_code(IssueCode::InactiveAccount));
    }

    #[test]
    fn test_both_sides_set() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(100), dec!(20)),
                line(f.bank_id, dec!(0), dec!(80)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, true);
        assert!(report.has_code(IssueCode::BothSidesSet));
    }

    #[test]
    fn test_negative_amount() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(-100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(-100)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, true);
        assert_eq!(
            report
                .issues
                .iter()
                .filter(|i| i.code == IssueCode::NegativeAmount)
                .count(),
            2
        );
    }

    #[test]
    fn test_empty_line() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(0), dec!(0)),
                line(f.bank_id, dec!(0), dec!(0)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, true);
        assert!(report.has_code(IssueCode::EmptyLine));
    }

    #[test]
    fn test_closed_period() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(f.expense_id, dec!(100), dec!(0)),
                line(f.bank_id, dec!(0), dec!(100)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, false);
        assert_eq!(report.issues.len(), 1);
        assert!(report.has_code(IssueCode::PeriodClosed));
    }

    #[test]
    fn test_errors_accumulate() {
        let f = fixture();
        let entry = draft(
            &f,
            vec![
                line(AccountId::new(), dec!(100), dec!(50)),
                line(f.bank_id, dec!(0), dec!(90)),
            ],
        );

        let report = validate_entry(&entry, &f.snapshot, false);
        assert!(report.has_code(IssueCode::UnknownAccount));
        assert!(report.has_code(IssueCode::BothSidesSet));
        assert!(report.has_code(IssueCode::Unbalanced));
        assert!(report.has_code(IssueCode::PeriodClosed));
    }

    #[test]
    fn test_issue_code_strings() {
        assert_eq!(IssueCode::Unbalanced.as_str(), "UNBALANCED");
        assert_eq!(IssueCode::InsufficientLines.as_str(), "INSUFFICIENT_LINES");
        assert_eq!(IssueCode::PeriodClosed.as_str(), "PERIOD_CLOSED");
    }
}
