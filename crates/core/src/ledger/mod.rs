//! Double-entry journal logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and their lines
//! - Entry lifecycle (draft, posted, reconciled, cancelled)
//! - Business rule validation for proposed entries
//! - Entry number formatting and sequencing rules
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod numbering;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry::{DraftEntry, DraftLine, EntryStatus, EntryTotals, JournalEntry, JournalEntryLine};
pub use error::LedgerError;
pub use numbering::EntryNumber;
pub use validation::{IssueCode, ValidationIssue, ValidationReport, validate_entry};
