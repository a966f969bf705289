//! Journal repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use grandlivre_core::coa::{Journal, JournalType};
use grandlivre_shared::types::{CompanyId, JournalId};

use crate::entities::journals;

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Journal code already exists in the company.
    #[error("Journal code '{0}' already exists")]
    DuplicateCode(String),

    /// Journal not found.
    #[error("Journal not found: {0}")]
    JournalNotFound(JournalId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a journal.
#[derive(Debug, Clone)]
pub struct CreateJournalInput {
    /// Company ID.
    pub company_id: CompanyId,
    /// Short journal code (must be unique within the company).
    pub code: String,
    /// Journal name.
    pub name: String,
    /// Journal type.
    pub journal_type: JournalType,
}

/// Journal repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a journal.
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate code.
    pub async fn create_journal(&self, input: CreateJournalInput) -> Result<Journal, JournalError> {
        let exists = journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(input.company_id.into_inner()))
            .filter(journals::Column::Code.eq(input.code.clone()))
            .one(&self.db)
            .await?;
        if exists.is_some() {
            return Err(JournalError::DuplicateCode(input.code));
        }

        let now = Utc::now();
        let model = journals::ActiveModel {
            id: Set(JournalId::new().into_inner()),
            company_id: Set(input.company_id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            journal_type: Set(input.journal_type.into()),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await?;

        Ok(inserted.into())
    }

    /// Lists a company's journals ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_journals(&self, company_id: CompanyId) -> Result<Vec<Journal>, JournalError> {
        let models = journals::Entity::find()
            .filter(journals::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_asc(journals::Column::Code)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Journal::from).collect())
    }

    /// Loads one journal by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal does not exist.
    pub async fn get_journal(&self, journal_id: JournalId) -> Result<Journal, JournalError> {
        let model = journals::Entity::find_by_id(journal_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(JournalError::JournalNotFound(journal_id))?;

        Ok(model.into())
    }
}
