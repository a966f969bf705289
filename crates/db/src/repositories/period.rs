//! Accounting period repository for database operations.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use grandlivre_shared::types::{CompanyId, PeriodId};

use crate::entities::{accounting_periods, sea_orm_active_enums::PeriodStatus};

/// Error types for period operations.
#[derive(Debug, thiserror::Error)]
pub enum PeriodError {
    /// Start date must be on or before end date.
    #[error("Start date must be on or before end date")]
    InvalidDateRange,

    /// Period overlaps with an existing period.
    #[error("Period overlaps with existing period '{0}'")]
    OverlappingPeriod(String),

    /// Period not found.
    #[error("Period not found: {0}")]
    PeriodNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an accounting period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Company ID.
    pub company_id: CompanyId,
    /// Period name (e.g. "March 2026").
    pub name: String,
    /// Start date (inclusive).
    pub start_date: NaiveDate,
    /// End date (inclusive).
    pub end_date: NaiveDate,
}

/// Returns true if two inclusive date ranges overlap.
fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Accounting period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an accounting period.
    ///
    /// # Errors
    ///
    /// Returns an error for an inverted range or an overlap with an
    /// existing period of the company.
    pub async fn create_period(
        &self,
        input: CreatePeriodInput,
    ) -> Result<accounting_periods::Model, PeriodError> {
        if input.start_date > input.end_date {
            return Err(PeriodError::InvalidDateRange);
        }

        let existing = accounting_periods::Entity::find()
            .filter(accounting_periods::Column::CompanyId.eq(input.company_id.into_inner()))
            .all(&self.db)
            .await?;
        for period in &existing {
            if date_ranges_overlap(
                input.start_date,
                input.end_date,
                period.start_date,
                period.end_date,
            ) {
                return Err(PeriodError::OverlappingPeriod(period.name.clone()));
            }
        }

        let now = Utc::now();
        let model = accounting_periods::ActiveModel {
            id: Set(PeriodId::new().into_inner()),
            company_id: Set(input.company_id.into_inner()),
            name: Set(input.name),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(PeriodStatus::Open),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Returns true if `date` falls within an open period of the company.
    ///
    /// This is the boolean the entry validator consumes; period-closing
    /// policy itself lives with the period bookkeeping, not the validator.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_period_open(
        &self,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<bool, PeriodError> {
        Self::is_period_open_on(&self.db, company_id, date).await
    }

    /// Connection-generic variant of [`Self::is_period_open`], usable
    /// inside a posting transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn is_period_open_on<C: ConnectionTrait>(
        conn: &C,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> Result<bool, PeriodError> {
        let open = accounting_periods::Entity::find()
            .filter(accounting_periods::Column::CompanyId.eq(company_id.into_inner()))
            .filter(accounting_periods::Column::Status.eq(PeriodStatus::Open))
            .filter(accounting_periods::Column::StartDate.lte(date))
            .filter(accounting_periods::Column::EndDate.gte(date))
            .one(conn)
            .await?;

        Ok(open.is_some())
    }

    /// Lists the open date ranges of a company.
    ///
    /// Import runs resolve these once up front and test entry dates
    /// against them, instead of querying per entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_open_ranges(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<(NaiveDate, NaiveDate)>, PeriodError> {
        let periods = accounting_periods::Entity::find()
            .filter(accounting_periods::Column::CompanyId.eq(company_id.into_inner()))
            .filter(accounting_periods::Column::Status.eq(PeriodStatus::Open))
            .all(&self.db)
            .await?;

        Ok(periods
            .into_iter()
            .map(|period| (period.start_date, period.end_date))
            .collect())
    }

    /// Closes a period; posting into it is rejected afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the period does not exist.
    pub async fn close_period(&self, period_id: PeriodId) -> Result<(), PeriodError> {
        let model = accounting_periods::Entity::find_by_id(period_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(PeriodError::PeriodNotFound(period_id.into_inner()))?;

        let mut active: accounting_periods::ActiveModel = model.into();
        active.status = Set(PeriodStatus::Closed);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }
}
