//! `SeaORM` Entity for the chart of accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

/// A chart of accounts entry, unique per `(company_id, number)`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Company this account belongs to.
    pub company_id: Uuid,
    /// Account number (PCG numeric string).
    pub number: String,
    /// Account name.
    pub name: String,
    /// Statutory account type.
    pub account_type: AccountType,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Whether this is a detail (postable) account.
    pub is_detail_account: bool,
    /// When the account was created.
    pub created_at: DateTimeWithTimeZone,
    /// When the account was last updated.
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
    /// Lines posted to this account.
    #[sea_orm(has_many = "super::journal_entry_lines::Entity")]
    JournalEntryLines,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::journal_entry_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for grandlivre_core::coa::Account {
    fn from(model: Model) -> Self {
        Self {
            id: grandlivre_shared::types::AccountId::from_uuid(model.id),
            company_id: grandlivre_shared::types::CompanyId::from_uuid(model.company_id),
            number: model.number,
            name: model.name,
            account_type: model.account_type.into(),
            is_active: model.is_active,
            is_detail_account: model.is_detail_account,
        }
    }
}
