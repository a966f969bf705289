//! `SeaORM` Entity for the journals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::JournalType;

/// A journal, unique per `(company_id, code)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company this journal belongs to.
    pub company_id: Uuid,
    /// Short journal code (e.g. "VE", "BQ").
    pub code: String,
    /// Journal name.
    pub name: String,
    /// Journal type.
    pub journal_type: JournalType,
    /// Whether the journal accepts new entries.
    pub is_active: bool,
    /// When the journal was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the journal was last updated.
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
    /// Entries recorded in this journal.
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for grandlivre_core::coa::Journal {
    fn from(model: Model) -> Self {
        Self {
            id: grandlivre_shared::types::JournalId::from_uuid(model.id),
            company_id: grandlivre_shared::types::CompanyId::from_uuid(model.company_id),
            code: model.code,
            name: model.name,
            journal_type: model.journal_type.into(),
            is_active: model.is_active,
        }
    }
}
