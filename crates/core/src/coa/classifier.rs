//! PCG prefix-based account classification.
//!
//! Maps an account number to its statutory class (1-7), account type, and
//! budget bucket using one ordered table of prefix rules. Two-digit rules
//! are listed before the single-digit class fallbacks, so the most specific
//! prefix wins. The classifier is a pure function of the number string and
//! never requires a persisted account.

use serde::{Deserialize, Serialize};

use super::account::{Account, AccountType};

/// Statutory account class, the first digit of a PCG account number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Class 1 - capital and equity accounts.
    Capital,
    /// Class 2 - fixed asset accounts.
    FixedAssets,
    /// Class 3 - inventory accounts.
    Inventory,
    /// Class 4 - third-party accounts (payables, receivables, tax).
    ThirdParty,
    /// Class 5 - financial and cash accounts.
    Financial,
    /// Class 6 - expense accounts.
    Expense,
    /// Class 7 - revenue accounts.
    Revenue,
}

impl AccountClass {
    /// Returns the class for a leading digit, if it is a statutory class.
    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Capital),
            2 => Some(Self::FixedAssets),
            3 => Some(Self::Inventory),
            4 => Some(Self::ThirdParty),
            5 => Some(Self::Financial),
            6 => Some(Self::Expense),
            7 => Some(Self::Revenue),
            _ => None,
        }
    }

    /// Returns the class digit (1-7).
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::Capital => 1,
            Self::FixedAssets => 2,
            Self::Inventory => 3,
            Self::ThirdParty => 4,
            Self::Financial => 5,
            Self::Expense => 6,
            Self::Revenue => 7,
        }
    }
}

/// Budget/reporting bucket an account rolls up into.
///
/// Layered on top of the class rules with two-digit overrides for the
/// personnel/tax/financial/exceptional distinctions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetBucket {
    /// Capital and reserves.
    Capital,
    /// Fixed asset investment.
    Investment,
    /// Inventory movements.
    Inventory,
    /// Receivables and payables.
    ThirdParty,
    /// Taxes and social contributions.
    Tax,
    /// Cash and bank.
    Treasury,
    /// Operating income or expense.
    Operating,
    /// Personnel costs.
    Personnel,
    /// Financial income or expense.
    FinancialResult,
    /// Exceptional income or expense.
    Exceptional,
}

/// Result of classifying an account number.
///
/// Unknown or malformed numbers yield `Unclassified` rather than an error,
/// so bulk imports can flag-and-continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Classification {
    /// The number matched a prefix rule.
    Classified {
        /// Statutory class (first digit).
        class: AccountClass,
        /// Statutory account type.
        account_type: AccountType,
        /// Budget/reporting bucket.
        bucket: BudgetBucket,
    },
    /// The number is empty, non-numeric, or outside classes 1-7.
    Unclassified,
}

impl Classification {
    /// Returns the statutory class, if classified.
    #[must_use]
    pub const fn class(self) -> Option<AccountClass> {
        match self {
            Self::Classified { class, .. } => Some(class),
            Self::Unclassified => None,
        }
    }

    /// Returns the account type, if classified.
    #[must_use]
    pub const fn account_type(self) -> Option<AccountType> {
        match self {
            Self::Classified { account_type, .. } => Some(account_type),
            Self::Unclassified => None,
        }
    }

    /// Returns the budget bucket, if classified.
    #[must_use]
    pub const fn bucket(self) -> Option<BudgetBucket> {
        match self {
            Self::Classified { bucket, .. } => Some(bucket),
            Self::Unclassified => None,
        }
    }

    /// Returns true for unclassifiable numbers.
    #[must_use]
    pub const fn is_unclassified(self) -> bool {
        matches!(self, Self::Unclassified)
    }
}

/// One prefix rule: the first matching prefix classifies the number.
struct ClassRule {
    prefix: &'static str,
    class: AccountClass,
    account_type: AccountType,
    bucket: BudgetBucket,
}

const fn rule(
    prefix: &'static str,
    class: AccountClass,
    account_type: AccountType,
    bucket: BudgetBucket,
) -> ClassRule {
    ClassRule {
        prefix,
        class,
        account_type,
        bucket,
    }
}

/// Ordered classification table. Two-digit refinements come first, the
/// single-digit class fallbacks last.
const RULES: &[ClassRule] = &[
    // Class 4 refinements: payables vs receivables vs tax vs staff.
    rule("40", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::ThirdParty),
    rule("41", AccountClass::ThirdParty, AccountType::Asset, BudgetBucket::ThirdParty),
    rule("42", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::Personnel),
    rule("43", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::Tax),
    rule("44", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::Tax),
    // Class 6 refinements: tax, personnel, financial, exceptional.
    rule("63", AccountClass::Expense, AccountType::Expense, BudgetBucket::Tax),
    rule("64", AccountClass::Expense, AccountType::Expense, BudgetBucket::Personnel),
    rule("66", AccountClass::Expense, AccountType::Expense, BudgetBucket::FinancialResult),
    rule("67", AccountClass::Expense, AccountType::Expense, BudgetBucket::Exceptional),
    rule("69", AccountClass::Expense, AccountType::Expense, BudgetBucket::Tax),
    // Class 7 refinements: financial and exceptional income.
    rule("76", AccountClass::Revenue, AccountType::Revenue, BudgetBucket::FinancialResult),
    rule("77", AccountClass::Revenue, AccountType::Revenue, BudgetBucket::Exceptional),
    // Single-digit class fallbacks.
    rule("1", AccountClass::Capital, AccountType::Equity, BudgetBucket::Capital),
    rule("2", AccountClass::FixedAssets, AccountType::Asset, BudgetBucket::Investment),
    rule("3", AccountClass::Inventory, AccountType::Asset, BudgetBucket::Inventory),
    rule("4", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::ThirdParty),
    rule("5", AccountClass::Financial, AccountType::Asset, BudgetBucket::Treasury),
    rule("6", AccountClass::Expense, AccountType::Expense, BudgetBucket::Operating),
    rule("7", AccountClass::Revenue, AccountType::Revenue, BudgetBucket::Operating),
];

/// Classifies an account number by its PCG prefix.
///
/// Pure and deterministic. Empty, non-numeric, or class 8/9 numbers return
/// [`Classification::Unclassified`].
#[must_use]
pub fn classify(account_number: &str) -> Classification {
    if !Account::is_valid_number(account_number) {
        return Classification::Unclassified;
    }

    for rule in RULES {
        if account_number.starts_with(rule.prefix) {
            return Classification::Classified {
                class: rule.class,
                account_type: rule.account_type,
                bucket: rule.bucket,
            };
        }
    }

    Classification::Unclassified
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("101000", AccountClass::Capital, AccountType::Equity, BudgetBucket::Capital)]
    #[case("218300", AccountClass::FixedAssets, AccountType::Asset, BudgetBucket::Investment)]
    #[case("370000", AccountClass::Inventory, AccountType::Asset, BudgetBucket::Inventory)]
    #[case("401000", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::ThirdParty)]
    #[case("411000", AccountClass::ThirdParty, AccountType::Asset, BudgetBucket::ThirdParty)]
    #[case("421000", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::Personnel)]
    #[case("445710", AccountClass::ThirdParty, AccountType::Liability, BudgetBucket::Tax)]
    #[case("512000", AccountClass::Financial, AccountType::Asset, BudgetBucket::Treasury)]
    #[case("601000", AccountClass::Expense, AccountType::Expense, BudgetBucket::Operating)]
    #[case("635000", AccountClass::Expense, AccountType::Expense, BudgetBucket::Tax)]
    #[case("641000", AccountClass::Expense, AccountType::Expense, BudgetBucket::Personnel)]
    #[case("661000", AccountClass::Expense, AccountType::Expense, BudgetBucket::FinancialResult)]
    #[case("671000", AccountClass::Expense, AccountType::Expense, BudgetBucket::Exceptional)]
    #[case("701000", AccountClass::Revenue, AccountType::Revenue, BudgetBucket::Operating)]
    #[case("761000", AccountClass::Revenue, AccountType::Revenue, BudgetBucket::FinancialResult)]
    #[case("771000", AccountClass::Revenue, AccountType::Revenue, BudgetBucket::Exceptional)]
    fn test_prefix_rules(
        #[case] number: &str,
        #[case] class: AccountClass,
        #[case] account_type: AccountType,
        #[case] bucket: BudgetBucket,
    ) {
        assert_eq!(
            classify(number),
            Classification::Classified {
                class,
                account_type,
                bucket
            }
        );
    }

    #[test]
    fn test_revenue_operating_sub_bucket() {
        // 706200 is plain operating revenue: prefix 70 is neither 76 nor 77.
        let classification = classify("706200");
        assert_eq!(classification.class(), Some(AccountClass::Revenue));
        assert_eq!(classification.account_type(), Some(AccountType::Revenue));
        assert_eq!(classification.bucket(), Some(BudgetBucket::Operating));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("7a1")]
    #[case("800000")]
    #[case("900000")]
    #[case("0")]
    fn test_unclassified_inputs(#[case] number: &str) {
        assert_eq!(classify(number), Classification::Unclassified);
    }

    #[test]
    fn test_class_digit_roundtrip() {
        for digit in 1..=7u8 {
            let class = AccountClass::from_digit(digit).unwrap();
            assert_eq!(class.digit(), digit);
        }
        assert!(AccountClass::from_digit(0).is_none());
        assert!(AccountClass::from_digit(8).is_none());
        assert!(AccountClass::from_digit(9).is_none());
    }
}
