//! Atomic entry number allocation.
//!
//! Numbers are unique and strictly increasing within `(company, journal,
//! year)`. Allocation is a single upsert with `RETURNING`, so there is no
//! read-then-write window for two concurrent postings to race through:
//! the row lock taken by the statement serializes them. The statement is
//! always executed on the posting transaction's connection, so an aborted
//! posting surrenders its number increment with the rollback.

use sea_orm::{ConnectionTrait, DbErr, Statement};
use uuid::Uuid;

use grandlivre_core::ledger::EntryNumber;

/// Error types for number allocation.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    /// The upsert returned no row; allocation must abort the posting.
    #[error("Entry number allocation returned no row for journal {0}")]
    AllocationFailed(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Allocates entry numbers from per-journal counter rows.
pub struct SequenceRepository;

impl SequenceRepository {
    /// Allocates the next entry number for `(company, journal, year)`.
    ///
    /// Must be called on the posting transaction: the increment commits
    /// and rolls back with the entry itself, so a number is never issued
    /// without its entry or vice versa.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation statement fails; the caller
    /// must abort the whole posting and may retry it.
    pub async fn next_number<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        journal_id: Uuid,
        journal_code: &str,
        year: i32,
    ) -> Result<EntryNumber, SequenceError> {
        let statement = Statement::from_sql_and_values(
            conn.get_database_backend(),
            r"INSERT INTO journal_sequences (company_id, journal_id, year, last_value)
              VALUES ($1, $2, $3, 1)
              ON CONFLICT (company_id, journal_id, year)
              DO UPDATE SET last_value = journal_sequences.last_value + 1
              RETURNING last_value",
            [company_id.into(), journal_id.into(), year.into()],
        );

        let row = conn
            .query_one(statement)
            .await?
            .ok_or(SequenceError::AllocationFailed(journal_id))?;
        let last_value: i64 = row.try_get("", "last_value")?;

        Ok(EntryNumber::new(journal_code, year, last_value))
    }
}
