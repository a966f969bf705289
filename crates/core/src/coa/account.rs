//! Account and journal domain types.

use serde::{Deserialize, Serialize};

use grandlivre_shared::types::{AccountId, CompanyId, JournalId};

/// Statutory account type.
///
/// The type drives report bucketing and the normal balance side:
/// assets and expenses are debit-normal, the rest are credit-normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns true for debit-normal accounts (assets, expenses).
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Calculates the signed balance change for an entry on this account.
    ///
    /// Debit-normal: balance += debit - credit.
    /// Credit-normal: balance += credit - debit.
    #[must_use]
    pub fn balance_change(
        self,
        debit: rust_decimal::Decimal,
        credit: rust_decimal::Decimal,
    ) -> rust_decimal::Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// A chart of accounts entry.
///
/// Identity is `(company_id, number)`. The statutory class is derived from
/// the first digit of `number` by the classifier and is never stored, so it
/// cannot diverge from the number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Company (tenant) this account belongs to.
    pub company_id: CompanyId,
    /// Account number (non-empty numeric string, PCG convention).
    pub number: String,
    /// Account name.
    pub name: String,
    /// Statutory account type.
    pub account_type: AccountType,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Whether this is a detail (postable) account rather than a heading.
    pub is_detail_account: bool,
}

impl Account {
    /// Returns true if `number` is a well-formed account number
    /// (non-empty, ASCII digits only).
    #[must_use]
    pub fn is_valid_number(number: &str) -> bool {
        !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Journal type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalType {
    /// Sales journal.
    Sale,
    /// Purchases journal.
    Purchase,
    /// Bank journal.
    Bank,
    /// Cash journal.
    Cash,
    /// Miscellaneous operations journal.
    Miscellaneous,
}

/// A journal, referenced by every entry.
///
/// Identity is `(company_id, code)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: JournalId,
    /// Company (tenant) this journal belongs to.
    pub company_id: CompanyId,
    /// Short journal code (e.g. "VE", "BQ").
    pub code: String,
    /// Journal name.
    pub name: String,
    /// Journal type.
    pub journal_type: JournalType,
    /// Whether the journal accepts new entries.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_normal() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Equity.is_debit_normal());
        assert!(!AccountType::Revenue.is_debit_normal());
    }

    #[test]
    fn test_balance_change() {
        assert_eq!(AccountType::Asset.balance_change(dec!(100), dec!(30)), dec!(70));
        assert_eq!(AccountType::Revenue.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_valid_account_number() {
        assert!(Account::is_valid_number("706200"));
        assert!(Account::is_valid_number("1"));
        assert!(!Account::is_valid_number(""));
        assert!(!Account::is_valid_number("70A"));
        assert!(!Account::is_valid_number("70 1"));
    }
}
