//! `SeaORM` Entity for the generated reports table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ReportStatus, ReportType};

/// Metadata of a rendered report artifact.
///
/// The report data itself is derived from the ledger on demand; only the
/// artifact metadata is persisted, after an external renderer produced
/// the file.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "generated_reports")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company the report was generated for.
    pub company_id: Uuid,
    /// Report type.
    pub report_type: ReportType,
    /// Period start date.
    pub period_start: Date,
    /// Period end date.
    pub period_end: Date,
    /// Rendered file format (e.g. "csv", "pdf").
    pub file_format: String,
    /// User who requested the report.
    pub generated_by: Uuid,
    /// Artifact status.
    pub status: ReportStatus,
    /// When the artifact was recorded.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning company.
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
