//! Journal entry domain types.
//!
//! In double-entry bookkeeping every entry is a set of lines whose debits
//! and credits balance exactly. Draft entries are freely editable; once
//! posted they are append-only, and corrections happen through reversing
//! entries rather than in-place edits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use grandlivre_shared::types::{AccountId, CompanyId, EntryId, EntryLineId, JournalId};

use super::numbering::EntryNumber;

/// Journal entry lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been posted and reconciled against a settlement.
    Reconciled,
    /// Entry has been cancelled (immutable; a reversing entry carries the correction).
    Cancelled,
}

impl EntryStatus {
    /// Returns true if the entry can be modified.
    #[must_use]
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(self) -> bool {
        !self.is_editable()
    }

    /// Returns true if the entry's lines feed financial reports.
    #[must_use]
    pub fn is_reportable(self) -> bool {
        matches!(self, Self::Posted | Self::Reconciled)
    }

    /// Validates that an entry in this status can be modified.
    ///
    /// # Errors
    ///
    /// Returns an error for posted, reconciled, or cancelled entries.
    pub fn ensure_editable(self) -> Result<(), super::error::LedgerError> {
        match self {
            Self::Draft => Ok(()),
            Self::Cancelled => Err(super::error::LedgerError::CannotModifyCancelled),
            Self::Posted | Self::Reconciled => {
                Err(super::error::LedgerError::CannotModifyPosted)
            }
        }
    }

    /// Validates that an entry in this status can be deleted.
    ///
    /// # Errors
    ///
    /// Returns an error unless the entry is a draft.
    pub fn ensure_deletable(self) -> Result<(), super::error::LedgerError> {
        if self == Self::Draft {
            Ok(())
        } else {
            Err(super::error::LedgerError::CanOnlyDeleteDraft)
        }
    }

    /// Validates that an entry in this status can be posted.
    ///
    /// # Errors
    ///
    /// Returns an error unless the entry is a draft.
    pub fn ensure_postable(self) -> Result<(), super::error::LedgerError> {
        if self == Self::Draft {
            Ok(())
        } else {
            Err(super::error::LedgerError::AlreadyPosted)
        }
    }
}

/// A single line of a journal entry.
///
/// Exactly one of `debit`/`credit` is strictly positive; the other is
/// exactly zero. Lines are exclusively owned by their parent entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryLine {
    /// Unique identifier.
    pub id: EntryLineId,
    /// The entry this line belongs to.
    pub entry_id: EntryId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl JournalEntryLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// A journal entry: a dated, balanced set of lines in one journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Company (tenant) this entry belongs to.
    pub company_id: CompanyId,
    /// Journal this entry is recorded in.
    pub journal_id: JournalId,
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Due date for settlement, when known (invoices). Ageing falls back
    /// to `entry_date` when absent.
    pub due_date: Option<NaiveDate>,
    /// Sequential entry number, assigned at posting time.
    pub entry_number: Option<EntryNumber>,
    /// Entry description.
    pub description: String,
    /// External reference (e.g. invoice number).
    pub reference: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// The entry's lines, in order.
    pub lines: Vec<JournalEntryLine>,
}

/// Debit/credit totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of line debits.
    pub total_debit: Decimal,
    /// Sum of line credits.
    pub total_credit: Decimal,
}

impl EntryTotals {
    /// Returns true if debits equal credits exactly.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }

    /// Returns the debit-minus-credit difference.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

impl JournalEntry {
    /// Calculates the entry's debit/credit totals.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals {
            total_debit: self.lines.iter().map(|l| l.debit).sum(),
            total_credit: self.lines.iter().map(|l| l.credit).sum(),
        }
    }

    /// Builds the reversing draft for this entry.
    ///
    /// Every line's debit and credit are swapped; the reversal references
    /// the original entry and starts life as a draft that goes through the
    /// normal validation and posting path.
    #[must_use]
    pub fn reversing_entry(&self, reversal_date: NaiveDate) -> Self {
        let id = EntryId::new();
        let lines = self
            .lines
            .iter()
            .map(|line| JournalEntryLine {
                id: EntryLineId::new(),
                entry_id: id,
                account_id: line.account_id,
                debit: line.credit,
                credit: line.debit,
                description: line.description.clone(),
                currency: line.currency.clone(),
            })
            .collect();

        Self {
            id,
            company_id: self.company_id,
            journal_id: self.journal_id,
            entry_date: reversal_date,
            due_date: None,
            entry_number: None,
            description: format!("Reversal of {}", self.description),
            reference: self
                .entry_number
                .as_ref()
                .map(std::string::ToString::to_string)
                .or_else(|| self.reference.clone()),
            status: EntryStatus::Draft,
            lines,
        }
    }
}

/// Input line for a proposed entry, before validation.
#[derive(Debug, Clone)]
pub struct DraftLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Input for a proposed journal entry.
///
/// This is what the validator and the import pipeline work on; it becomes
/// a [`JournalEntry`] only after validation passes and the commit step
/// persists it.
#[derive(Debug, Clone)]
pub struct DraftEntry {
    /// Company (tenant) the entry belongs to.
    pub company_id: CompanyId,
    /// Journal the entry is recorded in.
    pub journal_id: JournalId,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Due date, when known.
    pub due_date: Option<NaiveDate>,
    /// Entry description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Proposed lines.
    pub lines: Vec<DraftLine>,
}

impl DraftEntry {
    /// Calculates the draft's debit/credit totals.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals {
            total_debit: self.lines.iter().map(|l| l.debit).sum(),
            total_credit: self.lines.iter().map(|l| l.credit).sum(),
        }
    }
}
