//! FEC (Fichier des Écritures Comptables) import and export.
//!
//! The import pipeline turns a delimited ledger export into validated
//! candidate journal entries plus an error/warning report; the export
//! renders posted entries back into the statutory format.

pub mod error;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod row;

pub use error::ImportError;
pub use export::export_entries;
pub use pipeline::{
    CancelFlag, CandidateEntry, GroupKey, ImportOutcome, ImportPipeline, ImportStage,
    ImportSummary,
};
pub use row::{FecRow, ImportIssue, Severity};
