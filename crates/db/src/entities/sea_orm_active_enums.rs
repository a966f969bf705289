//! Database enum types mapped to PostgreSQL enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Statutory account type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Liability account.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Equity account.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Revenue account.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Expense account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for grandlivre_core::coa::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<grandlivre_core::coa::AccountType> for AccountType {
    fn from(value: grandlivre_core::coa::AccountType) -> Self {
        use grandlivre_core::coa::AccountType as Core;
        match value {
            Core::Asset => Self::Asset,
            Core::Liability => Self::Liability,
            Core::Equity => Self::Equity,
            Core::Revenue => Self::Revenue,
            Core::Expense => Self::Expense,
        }
    }
}

/// Journal type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_type")]
#[serde(rename_all = "lowercase")]
pub enum JournalType {
    /// Sales journal.
    #[sea_orm(string_value = "sale")]
    Sale,
    /// Purchases journal.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Bank journal.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Cash journal.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Miscellaneous operations journal.
    #[sea_orm(string_value = "miscellaneous")]
    Miscellaneous,
}

impl From<JournalType> for grandlivre_core::coa::JournalType {
    fn from(value: JournalType) -> Self {
        match value {
            JournalType::Sale => Self::Sale,
            JournalType::Purchase => Self::Purchase,
            JournalType::Bank => Self::Bank,
            JournalType::Cash => Self::Cash,
            JournalType::Miscellaneous => Self::Miscellaneous,
        }
    }
}

impl From<grandlivre_core::coa::JournalType> for JournalType {
    fn from(value: grandlivre_core::coa::JournalType) -> Self {
        use grandlivre_core::coa::JournalType as Core;
        match value {
            Core::Sale => Self::Sale,
            Core::Purchase => Self::Purchase,
            Core::Bank => Self::Bank,
            Core::Cash => Self::Cash,
            Core::Miscellaneous => Self::Miscellaneous,
        }
    }
}

/// Journal entry status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Draft entry.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted entry.
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Reconciled entry.
    #[sea_orm(string_value = "reconciled")]
    Reconciled,
    /// Cancelled entry.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<EntryStatus> for grandlivre_core::ledger::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Reconciled => Self::Reconciled,
            EntryStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<grandlivre_core::ledger::EntryStatus> for EntryStatus {
    fn from(value: grandlivre_core::ledger::EntryStatus) -> Self {
        use grandlivre_core::ledger::EntryStatus as Core;
        match value {
            Core::Draft => Self::Draft,
            Core::Posted => Self::Posted,
            Core::Reconciled => Self::Reconciled,
            Core::Cancelled => Self::Cancelled,
        }
    }
}

/// Accounting period status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "period_status")]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is open for posting.
    #[sea_orm(string_value = "open")]
    Open,
    /// Period is closed, no posting allowed.
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Generated report artifact status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "report_status")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Generation in progress.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Rendered and stored.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Generation failed.
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl From<grandlivre_core::reports::ReportStatus> for ReportStatus {
    fn from(value: grandlivre_core::reports::ReportStatus) -> Self {
        use grandlivre_core::reports::ReportStatus as Core;
        match value {
            Core::Pending => Self::Pending,
            Core::Completed => Self::Completed,
            Core::Failed => Self::Failed,
        }
    }
}

/// Generated report type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "report_type")]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    /// Trial balance.
    #[sea_orm(string_value = "trial_balance")]
    TrialBalance,
    /// Balance sheet.
    #[sea_orm(string_value = "balance_sheet")]
    BalanceSheet,
    /// Income statement.
    #[sea_orm(string_value = "income_statement")]
    IncomeStatement,
    /// VAT summary.
    #[sea_orm(string_value = "vat_summary")]
    VatSummary,
    /// Aged receivables.
    #[sea_orm(string_value = "aged_receivables")]
    AgedReceivables,
    /// Aged payables.
    #[sea_orm(string_value = "aged_payables")]
    AgedPayables,
}

impl From<grandlivre_core::reports::ReportType> for ReportType {
    fn from(value: grandlivre_core::reports::ReportType) -> Self {
        use grandlivre_core::reports::ReportType as Core;
        match value {
            Core::TrialBalance => Self::TrialBalance,
            Core::BalanceSheet => Self::BalanceSheet,
            Core::IncomeStatement => Self::IncomeStatement,
            Core::VatSummary => Self::VatSummary,
            Core::AgedReceivables => Self::AgedReceivables,
            Core::AgedPayables => Self::AgedPayables,
        }
    }
}
