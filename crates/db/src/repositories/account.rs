//! Account repository for chart of accounts database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use grandlivre_core::coa::{Account, AccountSnapshot, AccountType};
use grandlivre_shared::types::{AccountId, CompanyId};

use crate::entities::{accounts, journal_entry_lines};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account number already exists in the company.
    #[error("Account number '{0}' already exists")]
    DuplicateNumber(String),

    /// Account number is not a non-empty numeric string.
    #[error("Account number '{0}' is not a valid numeric string")]
    InvalidNumber(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Cannot delete an account referenced by ledger lines.
    #[error("Cannot delete account: it is referenced by {0} ledger line(s)")]
    HasLedgerLines(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Company ID.
    pub company_id: CompanyId,
    /// Account number (must be unique within the company).
    pub number: String,
    /// Account name.
    pub name: String,
    /// Statutory account type.
    pub account_type: AccountType,
    /// Whether this is a detail (postable) account.
    pub is_detail_account: bool,
}

/// Chart of accounts repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed or duplicate account number.
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, AccountError> {
        if !Account::is_valid_number(&input.number) {
            return Err(AccountError::InvalidNumber(input.number));
        }

        let exists = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(input.company_id.into_inner()))
            .filter(accounts::Column::Number.eq(input.number.clone()))
            .one(&self.db)
            .await?;
        if exists.is_some() {
            return Err(AccountError::DuplicateNumber(input.number));
        }

        let now = Utc::now();
        let model = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            company_id: Set(input.company_id.into_inner()),
            number: Set(input.number),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            is_active: Set(true),
            is_detail_account: Set(input.is_detail_account),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let inserted = model.insert(&self.db).await?;

        Ok(inserted.into())
    }

    /// Lists a company's accounts ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(&self, company_id: CompanyId) -> Result<Vec<Account>, AccountError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id.into_inner()))
            .order_by_asc(accounts::Column::Number)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    /// Loads the as-of snapshot of a company's chart of accounts.
    ///
    /// Validation, import, and reporting all work against this snapshot
    /// instead of re-querying mid-operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn snapshot(&self, company_id: CompanyId) -> Result<AccountSnapshot, AccountError> {
        let accounts = self.list_accounts(company_id).await?;
        Ok(AccountSnapshot::new(company_id, accounts))
    }

    /// Deactivates an account.
    ///
    /// Accounts referenced by posted lines are never hard-deleted;
    /// deactivation is the supported way to retire them.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist.
    pub async fn deactivate_account(&self, account_id: AccountId) -> Result<(), AccountError> {
        let model = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(account_id.into_inner()))?;

        let mut active: accounts::ActiveModel = model.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }

    /// Deletes an account that has never been posted to.
    ///
    /// # Errors
    ///
    /// Returns an error if any ledger line references the account.
    pub async fn delete_account(&self, account_id: AccountId) -> Result<(), AccountError> {
        let referencing = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()))
            .count(&self.db)
            .await?;
        if referencing > 0 {
            return Err(AccountError::HasLedgerLines(referencing));
        }

        let result = accounts::Entity::delete_by_id(account_id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(AccountError::AccountNotFound(account_id.into_inner()));
        }

        Ok(())
    }
}
