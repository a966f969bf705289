//! As-of snapshots of a company's chart of accounts.
//!
//! Validation, import, and reporting all read accounts through an explicit
//! snapshot taken at the start of the operation. A concurrent deactivation
//! therefore never invalidates an in-flight run: the run keeps the view it
//! started with.

use std::collections::HashMap;

use grandlivre_shared::types::{AccountId, CompanyId};

use super::account::Account;

/// An immutable view of one company's accounts at a point in time.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    company_id: CompanyId,
    accounts: Vec<Account>,
    by_id: HashMap<AccountId, usize>,
    by_number: HashMap<String, usize>,
}

impl AccountSnapshot {
    /// Builds a snapshot from a set of accounts.
    ///
    /// The snapshot records which company it was taken for; accounts of
    /// other companies are kept visible so the validator can report a
    /// cross-tenant reference as such instead of "unknown account".
    #[must_use]
    pub fn new(company_id: CompanyId, accounts: Vec<Account>) -> Self {
        let mut by_id = HashMap::with_capacity(accounts.len());
        let mut by_number = HashMap::with_capacity(accounts.len());
        for (idx, account) in accounts.iter().enumerate() {
            by_id.insert(account.id, idx);
            by_number.insert(account.number.clone(), idx);
        }

        Self {
            company_id,
            accounts,
            by_id,
            by_number,
        }
    }

    /// The company this snapshot belongs to.
    #[must_use]
    pub const fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Looks up an account by ID.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.by_id.get(&id).map(|&idx| &self.accounts[idx])
    }

    /// Looks up an account by number.
    #[must_use]
    pub fn find_by_number(&self, number: &str) -> Option<&Account> {
        self.by_number.get(number).map(|&idx| &self.accounts[idx])
    }

    /// All accounts in the snapshot, in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Number of accounts in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the snapshot holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::account::AccountType;

    fn make_account(company_id: CompanyId, number: &str) -> Account {
        Account {
            id: AccountId::new(),
            company_id,
            number: number.to_string(),
            name: format!("Account {number}"),
            account_type: AccountType::Asset,
            is_active: true,
            is_detail_account: true,
        }
    }

    #[test]
    fn test_lookup_by_id_and_number() {
        let company_id = CompanyId::new();
        let account = make_account(company_id, "512000");
        let id = account.id;

        let snapshot = AccountSnapshot::new(company_id, vec![account]);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(id).unwrap().number, "512000");
        assert_eq!(snapshot.find_by_number("512000").unwrap().id, id);
        assert!(snapshot.find_by_number("601000").is_none());
    }

    #[test]
    fn test_foreign_company_accounts_remain_visible() {
        // Cross-tenant references must be distinguishable from unknown
        // accounts, so the snapshot does not silently drop them.
        let company_id = CompanyId::new();
        let foreign = make_account(CompanyId::new(), "411000");
        let foreign_id = foreign.id;

        let snapshot = AccountSnapshot::new(company_id, vec![foreign]);

        assert_ne!(snapshot.company_id(), snapshot.get(foreign_id).unwrap().company_id);
    }
}
