//! `SeaORM` Entity for the journal entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;

/// A journal entry header.
///
/// `entry_number` stays NULL while the entry is a draft and is assigned
/// exactly once, at posting time. The `(company_id, journal_id,
/// entry_number)` uniqueness constraint backstops the sequencer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company this entry belongs to.
    pub company_id: Uuid,
    /// Journal this entry is recorded in.
    pub journal_id: Uuid,
    /// Accounting date.
    pub entry_date: Date,
    /// Due date, when known.
    pub due_date: Option<Date>,
    /// Sequential entry number, assigned at posting time.
    pub entry_number: Option<String>,
    /// Entry description.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// When the entry was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the entry was last updated.
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
    /// The journal this entry is recorded in.
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id"
    )]
    Journals,
    /// The entry's lines.
    #[sea_orm(has_many = "super::journal_entry_lines::Entity")]
    JournalEntryLines,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journals.def()
    }
}

impl Related<super::journal_entry_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
