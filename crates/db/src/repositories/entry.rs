//! Journal entry repository: drafts, posting, import commit, and the
//! read-side queries reports are built on.
//!
//! Posting is one transaction: status guard, validation, atomic number
//! allocation, and the status flip commit or roll back together, so a
//! number is never issued without its posted entry or vice versa.

use chrono::{Datelike, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

use grandlivre_core::coa::AccountSnapshot;
use grandlivre_core::fec::CandidateEntry;
use grandlivre_core::ledger::{
    DraftEntry, EntryNumber, EntryStatus as CoreEntryStatus, JournalEntry, JournalEntryLine,
    LedgerError, validate_entry,
};
use grandlivre_core::reports::PostedLine;
use grandlivre_shared::types::{AccountId, CompanyId, EntryId, EntryLineId, JournalId};

use crate::entities::{journal_entries, journal_entry_lines, journals, sea_orm_active_enums};

use super::period::{PeriodError, PeriodRepository};
use super::sequence::{SequenceError, SequenceRepository};

/// Error types for entry operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// Entry not found.
    #[error("Entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Journal not found.
    #[error("Journal not found: {0}")]
    JournalNotFound(Uuid),

    /// Only posted entries can be cancelled; drafts are deleted instead.
    #[error("Only posted entries can be cancelled")]
    OnlyPostedCanBeCancelled,

    /// A stored entry number failed to parse.
    #[error("Stored entry number '{0}' is malformed")]
    MalformedNumber(String),

    /// Ledger rule violation (validation failure, state guard, or
    /// integrity breach).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Number allocation failure.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Period lookup failure.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Commit policy for validated import candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Each entry commits in its own transaction; failures are collected
    /// and the rest proceed.
    PerEntry,
    /// All entries commit in a single transaction; the first failure
    /// rolls everything back.
    AllOrNothing,
}

/// Outcome of committing an import.
#[derive(Debug, Default)]
pub struct ImportCommitOutcome {
    /// Posted entries: `(candidate key, assigned number)`.
    pub posted: Vec<(String, EntryNumber)>,
    /// Failed entries: `(candidate key, error message)`.
    pub failed: Vec<(String, String)>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists a draft entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_draft(&self, draft: &DraftEntry) -> Result<EntryId, EntryError> {
        let txn = self.db.begin().await?;
        let entry_id = Self::insert_draft_on(&txn, draft).await?;
        txn.commit().await?;
        Ok(entry_id)
    }

    /// Posts a draft entry: validates, allocates its number, and flips
    /// the status, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation rejection, a state guard error, or an
    /// integrity error; in every case nothing was persisted.
    pub async fn post_entry(
        &self,
        entry_id: EntryId,
        snapshot: &AccountSnapshot,
    ) -> Result<EntryNumber, EntryError> {
        let txn = self.db.begin().await?;
        let number = Self::post_on(&txn, entry_id, snapshot).await?;
        txn.commit().await?;

        info!(%entry_id, number = %number, "entry posted");
        Ok(number)
    }

    /// Commits validated import candidates under the given policy.
    ///
    /// Invalid candidates are skipped (the pipeline already reported
    /// them). With `PerEntry`, a failed entry is recorded and the rest
    /// proceed, in file order; with `AllOrNothing` the first failure
    /// rolls the whole batch back.
    ///
    /// # Errors
    ///
    /// Under `AllOrNothing`, returns the first entry's error. Under
    /// `PerEntry`, per-entry failures land in the outcome instead.
    pub async fn commit_import(
        &self,
        candidates: &[CandidateEntry],
        snapshot: &AccountSnapshot,
        policy: CommitPolicy,
    ) -> Result<ImportCommitOutcome, EntryError> {
        let mut outcome = ImportCommitOutcome::default();

        match policy {
            CommitPolicy::PerEntry => {
                for candidate in candidates.iter().filter(|c| c.is_valid()) {
                    let txn = self.db.begin().await?;
                    let result = async {
                        let entry_id = Self::insert_draft_on(&txn, &candidate.draft).await?;
                        Self::post_on(&txn, entry_id, snapshot).await
                    }
                    .await;

                    match result {
                        Ok(number) => {
                            txn.commit().await?;
                            outcome.posted.push((candidate.key.clone(), number));
                        }
                        Err(err) => {
                            txn.rollback().await?;
                            warn!(key = %candidate.key, error = %err, "import entry failed");
                            outcome.failed.push((candidate.key.clone(), err.to_string()));
                        }
                    }
                }
            }
            CommitPolicy::AllOrNothing => {
                let txn = self.db.begin().await?;
                for candidate in candidates.iter().filter(|c| c.is_valid()) {
                    let entry_id = Self::insert_draft_on(&txn, &candidate.draft).await?;
                    let number = Self::post_on(&txn, entry_id, snapshot).await?;
                    outcome.posted.push((candidate.key.clone(), number));
                }
                txn.commit().await?;
            }
        }

        Ok(outcome)
    }

    /// Loads one entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist.
    pub async fn get_entry(&self, entry_id: EntryId) -> Result<JournalEntry, EntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EntryError::EntryNotFound(entry_id.into_inner()))?;
        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.eq(entry_id.into_inner()))
            .order_by_asc(journal_entry_lines::Column::LineIndex)
            .all(&self.db)
            .await?;

        Self::to_core_entry(entry, lines)
    }

    /// Creates and persists the reversing draft for a posted entry.
    ///
    /// The reversal then goes through the normal posting path; the
    /// original entry is left untouched (append-only audit trail).
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or is not posted.
    pub async fn reverse_entry(
        &self,
        entry_id: EntryId,
        reversal_date: chrono::NaiveDate,
    ) -> Result<EntryId, EntryError> {
        let original = self.get_entry(entry_id).await?;
        if !original.status.is_reportable() {
            return Err(EntryError::OnlyPostedCanBeCancelled);
        }

        let reversal = original.reversing_entry(reversal_date);
        let draft = DraftEntry {
            company_id: reversal.company_id,
            journal_id: reversal.journal_id,
            entry_date: reversal.entry_date,
            due_date: reversal.due_date,
            description: reversal.description,
            reference: reversal.reference,
            lines: reversal
                .lines
                .into_iter()
                .map(|line| grandlivre_core::ledger::DraftLine {
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description,
                    currency: line.currency,
                })
                .collect(),
        };

        self.create_draft(&draft).await
    }

    /// Cancels a posted entry logically; the row is never removed.
    ///
    /// # Errors
    ///
    /// Returns an error for drafts (delete those instead) or already
    /// cancelled entries.
    pub async fn cancel_entry(&self, entry_id: EntryId) -> Result<(), EntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EntryError::EntryNotFound(entry_id.into_inner()))?;

        let status: CoreEntryStatus = entry.status.clone().into();
        if !status.is_reportable() {
            return Err(EntryError::OnlyPostedCanBeCancelled);
        }

        let mut active: journal_entries::ActiveModel = entry.into();
        active.status = Set(sea_orm_active_enums::EntryStatus::Cancelled);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Deletes a draft entry and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error unless the entry is a draft.
    pub async fn delete_draft(&self, entry_id: EntryId) -> Result<(), EntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(EntryError::EntryNotFound(entry_id.into_inner()))?;

        let status: CoreEntryStatus = entry.status.clone().into();
        status.ensure_deletable().map_err(EntryError::Ledger)?;

        journal_entries::Entity::delete_by_id(entry_id.into_inner())
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Queries the posted (and reconciled) lines of a company for a
    /// period, flattened for the report engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn query_posted_lines(
        &self,
        company_id: CompanyId,
        period_start: chrono::NaiveDate,
        period_end: chrono::NaiveDate,
    ) -> Result<Vec<PostedLine>, EntryError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::CompanyId.eq(company_id.into_inner()))
            .filter(journal_entries::Column::Status.is_in([
                sea_orm_active_enums::EntryStatus::Posted,
                sea_orm_active_enums::EntryStatus::Reconciled,
            ]))
            .filter(journal_entries::Column::EntryDate.gte(period_start))
            .filter(journal_entries::Column::EntryDate.lte(period_end))
            .order_by_asc(journal_entries::Column::EntryDate)
            .all(&self.db)
            .await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let headers: HashMap<Uuid, &journal_entries::Model> =
            entries.iter().map(|entry| (entry.id, entry)).collect();
        let entry_ids: Vec<Uuid> = entries.iter().map(|entry| entry.id).collect();

        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.is_in(entry_ids))
            .order_by_asc(journal_entry_lines::Column::EntryId)
            .order_by_asc(journal_entry_lines::Column::LineIndex)
            .all(&self.db)
            .await?;

        Ok(lines
            .into_iter()
            .filter_map(|line| {
                headers.get(&line.entry_id).map(|entry| PostedLine {
                    entry_id: EntryId::from_uuid(entry.id),
                    entry_date: entry.entry_date,
                    due_date: entry.due_date,
                    reference: entry.reference.clone(),
                    status: entry.status.clone().into(),
                    account_id: AccountId::from_uuid(line.account_id),
                    debit: line.debit,
                    credit: line.credit,
                })
            })
            .collect())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn insert_draft_on<C: ConnectionTrait>(
        conn: &C,
        draft: &DraftEntry,
    ) -> Result<EntryId, EntryError> {
        let entry_id = EntryId::new();
        let now = Utc::now();

        let entry = journal_entries::ActiveModel {
            id: Set(entry_id.into_inner()),
            company_id: Set(draft.company_id.into_inner()),
            journal_id: Set(draft.journal_id.into_inner()),
            entry_date: Set(draft.entry_date),
            due_date: Set(draft.due_date),
            entry_number: Set(None),
            description: Set(draft.description.clone()),
            reference: Set(draft.reference.clone()),
            status: Set(sea_orm_active_enums::EntryStatus::Draft),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        entry.insert(conn).await?;

        for (index, line) in draft.lines.iter().enumerate() {
            let line_model = journal_entry_lines::ActiveModel {
                id: Set(EntryLineId::new().into_inner()),
                entry_id: Set(entry_id.into_inner()),
                account_id: Set(line.account_id.into_inner()),
                line_index: Set(i32::try_from(index).unwrap_or(i32::MAX)),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line.description.clone()),
                currency: Set(line.currency.clone()),
            };
            line_model.insert(conn).await?;
        }

        Ok(entry_id)
    }

    async fn post_on<C: ConnectionTrait>(
        conn: &C,
        entry_id: EntryId,
        snapshot: &AccountSnapshot,
    ) -> Result<EntryNumber, EntryError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(conn)
            .await?
            .ok_or(EntryError::EntryNotFound(entry_id.into_inner()))?;

        let status: CoreEntryStatus = entry.status.clone().into();
        status.ensure_postable().map_err(EntryError::Ledger)?;

        let lines = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.eq(entry_id.into_inner()))
            .order_by_asc(journal_entry_lines::Column::LineIndex)
            .all(conn)
            .await?;

        let draft = DraftEntry {
            company_id: CompanyId::from_uuid(entry.company_id),
            journal_id: JournalId::from_uuid(entry.journal_id),
            entry_date: entry.entry_date,
            due_date: entry.due_date,
            description: entry.description.clone(),
            reference: entry.reference.clone(),
            lines: lines
                .iter()
                .map(|line| grandlivre_core::ledger::DraftLine {
                    account_id: AccountId::from_uuid(line.account_id),
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description.clone(),
                    currency: line.currency.clone(),
                })
                .collect(),
        };

        let period_open = PeriodRepository::is_period_open_on(
            conn,
            CompanyId::from_uuid(entry.company_id),
            entry.entry_date,
        )
        .await?;

        let report = validate_entry(&draft, snapshot, period_open);
        if !report.is_ok() {
            return Err(EntryError::Ledger(LedgerError::Rejected { report }));
        }

        let journal = journals::Entity::find_by_id(entry.journal_id)
            .one(conn)
            .await?
            .ok_or(EntryError::JournalNotFound(entry.journal_id))?;

        let number = SequenceRepository::next_number(
            conn,
            entry.company_id,
            entry.journal_id,
            &journal.code,
            entry.entry_date.year(),
        )
        .await?;

        let mut active: journal_entries::ActiveModel = entry.into();
        active.entry_number = Set(Some(number.to_string()));
        active.status = Set(sea_orm_active_enums::EntryStatus::Posted);
        active.updated_at = Set(Utc::now().into());
        active.update(conn).await.map_err(|err| {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                EntryError::Ledger(LedgerError::DuplicateEntryNumber {
                    number: number.to_string(),
                    journal_code: journal.code.clone(),
                })
            } else {
                EntryError::Database(err)
            }
        })?;

        Ok(number)
    }

    fn to_core_entry(
        entry: journal_entries::Model,
        lines: Vec<journal_entry_lines::Model>,
    ) -> Result<JournalEntry, EntryError> {
        let entry_number = entry
            .entry_number
            .as_deref()
            .map(EntryNumber::from_str)
            .transpose()
            .map_err(|_| {
                EntryError::MalformedNumber(entry.entry_number.clone().unwrap_or_default())
            })?;

        Ok(JournalEntry {
            id: EntryId::from_uuid(entry.id),
            company_id: CompanyId::from_uuid(entry.company_id),
            journal_id: JournalId::from_uuid(entry.journal_id),
            entry_date: entry.entry_date,
            due_date: entry.due_date,
            entry_number,
            description: entry.description,
            reference: entry.reference,
            status: entry.status.into(),
            lines: lines
                .into_iter()
                .map(|line| JournalEntryLine {
                    id: EntryLineId::from_uuid(line.id),
                    entry_id: EntryId::from_uuid(line.entry_id),
                    account_id: AccountId::from_uuid(line.account_id),
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description,
                    currency: line.currency,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_policy_semantics() {
        assert_ne!(CommitPolicy::PerEntry, CommitPolicy::AllOrNothing);
    }

    #[test]
    fn test_import_commit_outcome_default_is_empty() {
        let outcome = ImportCommitOutcome::default();
        assert!(outcome.posted.is_empty());
        assert!(outcome.failed.is_empty());
    }
}
