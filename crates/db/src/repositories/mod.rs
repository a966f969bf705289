//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Each repository owns the errors of its domain.

pub mod account;
pub mod entry;
pub mod journal;
pub mod period;
pub mod report;
pub mod sequence;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use entry::{CommitPolicy, EntryError, EntryRepository, ImportCommitOutcome};
pub use journal::{CreateJournalInput, JournalError, JournalRepository};
pub use period::{CreatePeriodInput, PeriodError, PeriodRepository};
pub use report::{ReportArtifactError, ReportRepository};
pub use sequence::{SequenceError, SequenceRepository};
