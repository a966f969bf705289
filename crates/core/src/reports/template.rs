//! Declarative report templates.
//!
//! A statement report is a template of sections and line items, each item
//! carrying a calculation type: `Sum` over account-number prefixes, or
//! `Difference` between two earlier line items. One evaluator interprets
//! every template, so new statement layouts are data, not new aggregation
//! code.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coa::classify;

use super::error::ReportError;
use super::types::AccountAggregate;

/// How a line item's amount is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum CalculationType {
    /// Sum of oriented account balances over the given number prefixes.
    Sum {
        /// Account-number prefixes rolled up into this line.
        prefixes: Vec<String>,
    },
    /// Difference between two previously computed line items.
    Difference {
        /// Line id of the minuend.
        minuend: String,
        /// Line id of the subtrahend.
        subtrahend: String,
    },
}

/// One line of a statement template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable id, referenceable by `Difference` items.
    pub id: String,
    /// Display label.
    pub label: String,
    /// The line's calculation.
    pub calculation: CalculationType,
    /// Internal lines participate in calculations but are not rendered.
    #[serde(default)]
    pub internal: bool,
}

/// A titled group of line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section label.
    pub label: String,
    /// Items, evaluated in order.
    pub items: Vec<LineItem>,
}

/// A statement report template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportTemplate {
    /// Template name.
    pub name: String,
    /// Sections, evaluated in order.
    pub sections: Vec<Section>,
}

/// One evaluated statement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Line id from the template.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Computed amount.
    pub amount: Decimal,
}

/// One evaluated section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section label.
    pub label: String,
    /// Rendered lines (internal items omitted).
    pub lines: Vec<StatementLine>,
}

/// An evaluated statement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementReport {
    /// Template name.
    pub name: String,
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Evaluated sections.
    pub sections: Vec<StatementSection>,
}

impl StatementReport {
    /// Looks up a rendered line's amount by id.
    #[must_use]
    pub fn line_amount(&self, id: &str) -> Option<Decimal> {
        self.sections
            .iter()
            .flat_map(|section| section.lines.iter())
            .find(|line| line.id == id)
            .map(|line| line.amount)
    }
}

/// Oriented balance of one account: credit-normal accounts (liability,
/// equity, revenue) flip sign so every statement line reads positive in
/// its natural direction. Unclassifiable numbers keep the raw balance.
fn oriented_balance(aggregate: &AccountAggregate) -> Decimal {
    match classify(&aggregate.account_number).account_type() {
        Some(account_type) => {
            account_type.balance_change(aggregate.total_debit, aggregate.total_credit)
        }
        None => aggregate.balance(),
    }
}

impl ReportTemplate {
    /// Evaluates the template against per-account aggregates.
    ///
    /// Items are computed in declaration order; a `Difference` may
    /// reference any earlier item, including internal ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a `Difference` references an id that has not
    /// been computed yet.
    pub fn evaluate(
        &self,
        accounts: &[AccountAggregate],
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<StatementReport, ReportError> {
        let mut values: HashMap<&str, Decimal> = HashMap::new();
        let mut sections = Vec::with_capacity(self.sections.len());

        for section in &self.sections {
            let mut lines = Vec::new();
            for item in &section.items {
                let amount = match &item.calculation {
                    CalculationType::Sum { prefixes } => accounts
                        .iter()
                        .filter(|aggregate| {
                            prefixes
                                .iter()
                                .any(|prefix| aggregate.account_number.starts_with(prefix.as_str()))
                        })
                        .map(oriented_balance)
                        .sum(),
                    CalculationType::Difference {
                        minuend,
                        subtrahend,
                    } => {
                        let lookup = |id: &String| {
                            values
                                .get(id.as_str())
                                .copied()
                                .ok_or_else(|| ReportError::UnknownLineReference(id.clone()))
                        };
                        lookup(minuend)? - lookup(subtrahend)?
                    }
                };

                values.insert(item.id.as_str(), amount);
                if !item.internal {
                    lines.push(StatementLine {
                        id: item.id.clone(),
                        label: item.label.clone(),
                        amount,
                    });
                }
            }
            sections.push(StatementSection {
                label: section.label.clone(),
                lines,
            });
        }

        Ok(StatementReport {
            name: self.name.clone(),
            period_start,
            period_end,
            sections,
        })
    }
}

fn item(id: &str, label: &str, calculation: CalculationType) -> LineItem {
    LineItem {
        id: id.to_string(),
        label: label.to_string(),
        calculation,
        internal: false,
    }
}

fn internal_item(id: &str, calculation: CalculationType) -> LineItem {
    LineItem {
        id: id.to_string(),
        label: String::new(),
        calculation,
        internal: true,
    }
}

fn sum(prefixes: &[&str]) -> CalculationType {
    CalculationType::Sum {
        prefixes: prefixes.iter().map(|p| (*p).to_string()).collect(),
    }
}

fn difference(minuend: &str, subtrahend: &str) -> CalculationType {
    CalculationType::Difference {
        minuend: minuend.to_string(),
        subtrahend: subtrahend.to_string(),
    }
}

/// The built-in balance sheet template.
#[must_use]
pub fn balance_sheet_template() -> ReportTemplate {
    ReportTemplate {
        name: "balance_sheet".to_string(),
        sections: vec![
            Section {
                label: "Assets".to_string(),
                items: vec![
                    item("fixed_assets", "Fixed assets", sum(&["2"])),
                    item("inventory", "Inventory", sum(&["3"])),
                    item("customer_receivables", "Customer receivables", sum(&["41"])),
                    item("treasury", "Cash and equivalents", sum(&["5"])),
                    item(
                        "total_assets",
                        "Total assets",
                        sum(&["2", "3", "41", "5"]),
                    ),
                ],
            },
            Section {
                label: "Liabilities".to_string(),
                items: vec![
                    item("supplier_payables", "Supplier payables", sum(&["40"])),
                    item(
                        "personnel_and_social",
                        "Personnel and social liabilities",
                        sum(&["42", "43"]),
                    ),
                    item("tax_payables", "Tax payables", sum(&["44"])),
                    item(
                        "other_third_party",
                        "Other third-party balances",
                        sum(&["45", "46", "47", "48", "49"]),
                    ),
                    item(
                        "total_liabilities",
                        "Total liabilities",
                        sum(&["40", "42", "43", "44", "45", "46", "47", "48", "49"]),
                    ),
                ],
            },
            Section {
                label: "Equity".to_string(),
                items: vec![
                    item("capital_and_reserves", "Capital and reserves", sum(&["1"])),
                    internal_item("bs_total_revenue", sum(&["7"])),
                    internal_item("bs_total_expense", sum(&["6"])),
                    item(
                        "net_result",
                        "Net result for the period",
                        difference("bs_total_revenue", "bs_total_expense"),
                    ),
                ],
            },
        ],
    }
}

/// The built-in income statement template.
///
/// Operating, financial, and exceptional results are split on the 66/67
/// and 76/77 prefixes; the net result is total class 7 minus total class 6.
#[must_use]
pub fn income_statement_template() -> ReportTemplate {
    ReportTemplate {
        name: "income_statement".to_string(),
        sections: vec![
            Section {
                label: "Operating".to_string(),
                items: vec![
                    item(
                        "operating_revenue",
                        "Operating revenue",
                        sum(&["70", "71", "72", "73", "74", "75", "78", "79"]),
                    ),
                    item(
                        "operating_expense",
                        "Operating expense",
                        sum(&["60", "61", "62", "63", "64", "65", "68"]),
                    ),
                    item(
                        "operating_result",
                        "Operating result",
                        difference("operating_revenue", "operating_expense"),
                    ),
                ],
            },
            Section {
                label: "Financial".to_string(),
                items: vec![
                    item("financial_income", "Financial income", sum(&["76"])),
                    item("financial_expense", "Financial expense", sum(&["66"])),
                    item(
                        "financial_result",
                        "Financial result",
                        difference("financial_income", "financial_expense"),
                    ),
                ],
            },
            Section {
                label: "Exceptional".to_string(),
                items: vec![
                    item("exceptional_income", "Exceptional income", sum(&["77"])),
                    item("exceptional_expense", "Exceptional expense", sum(&["67"])),
                    item(
                        "exceptional_result",
                        "Exceptional result",
                        difference("exceptional_income", "exceptional_expense"),
                    ),
                ],
            },
            Section {
                label: "Result".to_string(),
                items: vec![
                    item("income_tax", "Income tax", sum(&["69"])),
                    internal_item("is_total_revenue", sum(&["7"])),
                    internal_item("is_total_expense", sum(&["6"])),
                    item(
                        "net_result",
                        "Net result",
                        difference("is_total_revenue", "is_total_expense"),
                    ),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn aggregate(number: &str, debit: Decimal, credit: Decimal) -> AccountAggregate {
        AccountAggregate {
            account_number: number.to_string(),
            account_name: format!("Account {number}"),
            total_debit: debit,
            total_credit: credit,
        }
    }

    fn period() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_sum_orients_by_account_type() {
        let template = ReportTemplate {
            name: "test".to_string(),
            sections: vec![Section {
                label: "Revenue".to_string(),
                items: vec![item("revenue", "Revenue", sum(&["7"]))],
            }],
        };
        // Revenue account, credit-normal: a 100 credit reads as +100.
        let accounts = vec![aggregate("706200", dec!(0), dec!(100))];
        let (start, end) = period();

        let report = template.evaluate(&accounts, start, end).unwrap();
        assert_eq!(report.line_amount("revenue"), Some(dec!(100)));
    }

    #[test]
    fn test_difference_references_earlier_items() {
        let template = ReportTemplate {
            name: "test".to_string(),
            sections: vec![Section {
                label: "Result".to_string(),
                items: vec![
                    item("revenue", "Revenue", sum(&["7"])),
                    item("expense", "Expense", sum(&["6"])),
                    item("result", "Result", difference("revenue", "expense")),
                ],
            }],
        };
        let accounts = vec![
            aggregate("706200", dec!(0), dec!(100)),
            aggregate("601000", dec!(60), dec!(0)),
        ];
        let (start, end) = period();

        let report = template.evaluate(&accounts, start, end).unwrap();
        assert_eq!(report.line_amount("result"), Some(dec!(40)));
    }

    #[test]
    fn test_unknown_reference_is_an_error() {
        let template = ReportTemplate {
            name: "test".to_string(),
            sections: vec![Section {
                label: "Broken".to_string(),
                items: vec![item("x", "X", difference("nowhere", "nothing"))],
            }],
        };
        let (start, end) = period();

        let result = template.evaluate(&[], start, end);
        assert!(matches!(
            result,
            Err(ReportError::UnknownLineReference(id)) if id == "nowhere"
        ));
    }

    #[test]
    fn test_internal_items_hidden_but_referenceable() {
        let template = ReportTemplate {
            name: "test".to_string(),
            sections: vec![Section {
                label: "Result".to_string(),
                items: vec![
                    internal_item("revenue", sum(&["7"])),
                    internal_item("expense", sum(&["6"])),
                    item("result", "Result", difference("revenue", "expense")),
                ],
            }],
        };
        let accounts = vec![
            aggregate("706200", dec!(0), dec!(100)),
            aggregate("601000", dec!(60), dec!(0)),
        ];
        let (start, end) = period();

        let report = template.evaluate(&accounts, start, end).unwrap();
        assert_eq!(report.sections[0].lines.len(), 1);
        assert_eq!(report.line_amount("revenue"), None);
        assert_eq!(report.line_amount("result"), Some(dec!(40)));
    }

    #[test]
    fn test_income_statement_template_results() {
        let accounts = vec![
            aggregate("706200", dec!(0), dec!(1000)), // operating revenue
            aggregate("601000", dec!(400), dec!(0)),  // operating expense
            aggregate("661000", dec!(50), dec!(0)),   // financial expense
            aggregate("761000", dec!(0), dec!(20)),   // financial income
            aggregate("671000", dec!(10), dec!(0)),   // exceptional expense
        ];
        let (start, end) = period();

        let report = income_statement_template()
            .evaluate(&accounts, start, end)
            .unwrap();

        assert_eq!(report.line_amount("operating_result"), Some(dec!(600)));
        assert_eq!(report.line_amount("financial_result"), Some(dec!(-30)));
        assert_eq!(report.line_amount("exceptional_result"), Some(dec!(-10)));
        // Net result = total revenue (1020) - total expense (460).
        assert_eq!(report.line_amount("net_result"), Some(dec!(560)));
    }

    #[test]
    fn test_balance_sheet_template_balances() {
        // Capital 500, revenue 1000, expense 400: equity side 1100.
        // Assets: treasury 700 + receivables 400 = 1100.
        let accounts = vec![
            aggregate("101000", dec!(0), dec!(500)),
            aggregate("512000", dec!(700), dec!(0)),
            aggregate("411000", dec!(400), dec!(0)),
            aggregate("706200", dec!(0), dec!(1000)),
            aggregate("601000", dec!(400), dec!(0)),
        ];
        let (start, end) = period();

        let report = balance_sheet_template()
            .evaluate(&accounts, start, end)
            .unwrap();

        assert_eq!(report.line_amount("total_assets"), Some(dec!(1100)));
        assert_eq!(report.line_amount("capital_and_reserves"), Some(dec!(500)));
        assert_eq!(report.line_amount("net_result"), Some(dec!(600)));
        assert_eq!(report.line_amount("total_liabilities"), Some(dec!(0)));
    }
}
