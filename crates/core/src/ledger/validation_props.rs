//! Property-based tests for journal entry validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use grandlivre_shared::types::{AccountId, CompanyId, JournalId};

use crate::coa::AccountSnapshot;
use crate::coa::account::{Account, AccountType};

use super::entry::{DraftEntry, DraftLine};
use super::validation::{IssueCode, validate_entry};

/// Strategy for positive amounts expressed in cents.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a list of positive amounts.
fn amounts(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(positive_amount(), 1..=max_len)
}

struct Fixture {
    company_id: CompanyId,
    snapshot: AccountSnapshot,
    debit_account: AccountId,
    credit_account: AccountId,
}

fn fixture() -> Fixture {
    let company_id = CompanyId::new();
    let debit = Account {
        id: AccountId::new(),
        company_id,
        number: "601000".to_string(),
        name: "Purchases".to_string(),
        account_type: AccountType::Expense,
        is_active: true,
        is_detail_account: true,
    };
    let credit = Account {
        id: AccountId::new(),
        company_id,
        number: "512000".to_string(),
        name: "Bank".to_string(),
        account_type: AccountType::Asset,
        is_active: true,
        is_detail_account: true,
    };
    let debit_account = debit.id;
    let credit_account = credit.id;
    Fixture {
        company_id,
        snapshot: AccountSnapshot::new(company_id, vec![debit, credit]),
        debit_account,
        credit_account,
    }
}

fn draft(fixture: &Fixture, lines: Vec<DraftLine>) -> DraftEntry {
    DraftEntry {
        company_id: fixture.company_id,
        journal_id: JournalId::new(),
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        due_date: None,
        description: "Generated entry".to_string(),
        reference: None,
        lines,
    }
}

fn debit_line(account_id: AccountId, amount: Decimal) -> DraftLine {
    DraftLine {
        account_id,
        debit: amount,
        credit: Decimal::ZERO,
        description: None,
        currency: "EUR".to_string(),
    }
}

fn credit_line(account_id: AccountId, amount: Decimal) -> DraftLine {
    DraftLine {
        account_id,
        debit: Decimal::ZERO,
        credit: amount,
        description: None,
        currency: "EUR".to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* set of debit amounts mirrored by one balancing credit,
    /// validation accepts the entry.
    #[test]
    fn prop_balanced_entries_validate(debits in amounts(10)) {
        let f = fixture();
        let total: Decimal = debits.iter().copied().sum();

        let mut lines: Vec<DraftLine> = debits
            .iter()
            .map(|&amount| debit_line(f.debit_account, amount))
            .collect();
        lines.push(credit_line(f.credit_account, total));

        let report = validate_entry(&draft(&f, lines), &f.snapshot, true);
        prop_assert!(report.is_ok(), "issues: {:?}", report.issues);
    }

    /// *For any* balanced line set skewed by a non-zero delta, validation
    /// reports `UNBALANCED`. Unbalanced sets must never pass.
    #[test]
    fn prop_unbalanced_entries_rejected(
        debits in amounts(10),
        delta in positive_amount(),
    ) {
        let f = fixture();
        let total: Decimal = debits.iter().copied().sum();

        let mut lines: Vec<DraftLine> = debits
            .iter()
            .map(|&amount| debit_line(f.debit_account, amount))
            .collect();
        lines.push(credit_line(f.credit_account, total + delta));

        let report = validate_entry(&draft(&f, lines), &f.snapshot, true);
        prop_assert!(report.has_code(IssueCode::Unbalanced));
    }

    /// *For any* line carrying both a debit and a credit, validation
    /// reports `BOTH_SIDES_SET`: no line is simultaneously both.
    #[test]
    fn prop_line_exclusivity(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        let f = fixture();
        let lines = vec![
            DraftLine {
                account_id: f.debit_account,
                debit,
                credit,
                description: None,
                currency: "EUR".to_string(),
            },
            credit_line(f.credit_account, debit),
        ];

        let report = validate_entry(&draft(&f, lines), &f.snapshot, true);
        prop_assert!(report.has_code(IssueCode::BothSidesSet));
    }

    /// *For any* single-line entry, validation reports the line-count rule.
    #[test]
    fn prop_single_line_rejected(amount in positive_amount()) {
        let f = fixture();
        let lines = vec![debit_line(f.debit_account, amount)];

        let report = validate_entry(&draft(&f, lines), &f.snapshot, true);
        prop_assert!(report.has_code(IssueCode::InsufficientLines));
    }

    /// Validation is pure: the same entry yields the same report.
    #[test]
    fn prop_validation_deterministic(debits in amounts(6)) {
        let f = fixture();
        let total: Decimal = debits.iter().copied().sum();

        let mut lines: Vec<DraftLine> = debits
            .iter()
            .map(|&amount| debit_line(f.debit_account, amount))
            .collect();
        lines.push(credit_line(f.credit_account, total));
        let entry = draft(&f, lines);

        let first = validate_entry(&entry, &f.snapshot, true);
        let second = validate_entry(&entry, &f.snapshot, true);
        prop_assert_eq!(first.is_ok(), second.is_ok());
        prop_assert_eq!(first.issues.len(), second.issues.len());
    }
}
