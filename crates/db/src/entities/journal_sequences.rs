//! `SeaORM` Entity for the journal sequences table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-journal entry number counter.
///
/// One row per `(company_id, journal_id, year)`. The counter is only ever
/// advanced by the atomic upsert in the sequence repository, inside the
/// posting transaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_sequences")]
pub struct Model {
    /// Company the counter belongs to.
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: Uuid,
    /// Journal the counter belongs to.
    #[sea_orm(primary_key, auto_increment = false)]
    pub journal_id: Uuid,
    /// Calendar year of the numbered entries.
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    /// Last issued sequence value.
    pub last_value: i64,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The journal this counter numbers.
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id"
    )]
    Journals,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
