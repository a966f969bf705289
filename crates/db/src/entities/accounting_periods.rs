//! `SeaORM` Entity for the accounting periods table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PeriodStatus;

/// An accounting period controlling posting permissions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounting_periods")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company this period belongs to.
    pub company_id: Uuid,
    /// Period name (e.g. "March 2026").
    pub name: String,
    /// Start date (inclusive).
    pub start_date: Date,
    /// End date (inclusive).
    pub end_date: Date,
    /// Current status.
    pub status: PeriodStatus,
    /// When the period was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the period was last updated.
    pub updated_at: DateTimeWithTimeZone,
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
