//! Generated report artifact repository.
//!
//! The engine computes report data; an external renderer writes the file.
//! This repository only records the artifact metadata trail.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use grandlivre_core::reports::{GeneratedReport, ReportStatus};
use grandlivre_shared::types::{CompanyId, ReportId};

use crate::entities::generated_reports;

/// Error types for report artifact operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportArtifactError {
    /// Artifact not found.
    #[error("Generated report not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Generated report artifact repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a generated report artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn record(&self, report: &GeneratedReport) -> Result<(), ReportArtifactError> {
        let model = generated_reports::ActiveModel {
            id: Set(report.id.into_inner()),
            company_id: Set(report.company_id.into_inner()),
            report_type: Set(report.report_type.into()),
            period_start: Set(report.period_start),
            period_end: Set(report.period_end),
            file_format: Set(report.file_format.clone()),
            generated_by: Set(report.generated_by.into_inner()),
            status: Set(report.status.into()),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&self.db).await?;

        Ok(())
    }

    /// Updates an artifact's status after rendering finished (or failed).
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub async fn set_status(
        &self,
        report_id: ReportId,
        status: ReportStatus,
    ) -> Result<(), ReportArtifactError> {
        let model = generated_reports::Entity::find_by_id(report_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ReportArtifactError::NotFound(report_id.into_inner()))?;

        let mut active: generated_reports::ActiveModel = model.into();
        active.status = Set(status.into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Lists a company's artifacts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_for_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<generated_reports::Model>, ReportArtifactError> {
        Ok(generated_reports::Entity::find()
            .filter(generated_reports::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_desc(generated_reports::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
