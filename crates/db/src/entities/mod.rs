//! `SeaORM` entity definitions for the ledger schema.

pub mod accounting_periods;
pub mod accounts;
pub mod companies;
pub mod generated_reports;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod journal_sequences;
pub mod journals;
pub mod sea_orm_active_enums;
