//! `SeaORM` Entity for the journal entry lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a journal entry.
///
/// Exactly one of `debit`/`credit` is strictly positive (validated before
/// persistence and enforced by a table check constraint).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entry_lines")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The entry this line belongs to.
    pub entry_id: Uuid,
    /// The account this line posts to.
    pub account_id: Uuid,
    /// Position within the entry.
    pub line_index: i32,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
    /// Optional line description.
    pub description: Option<String>,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning entry.
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::EntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
    /// The account this line posts to.
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
