//! The record store interface used by the session layer.
//!
//! `Bank` pairs the customer and account repositories and adds the
//! check-then-insert guards the repositories leave to their caller.

use crate::account::{Account, AccountKind};
use crate::account_store::{AccountStore, OwnerAccounts};
use crate::config::StoreConfig;
use crate::customer::Customer;
use crate::customer_store::CustomerStore;
use crate::error::{BankError, Result};
use log::info;

/// Customer and account record stores.
#[derive(Debug, Clone)]
pub struct Bank {
    customers: CustomerStore,
    accounts: AccountStore,
}

impl Bank {
    /// Opens the stores at the configured paths. Files are created lazily on
    /// first write.
    pub fn open(config: &StoreConfig) -> Self {
        Bank {
            customers: CustomerStore::new(&config.customer_path),
            accounts: AccountStore::new(&config.account_path),
        }
    }

    pub fn customers(&self) -> &CustomerStore {
        &self.customers
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn customer_exists(&self, username: &str) -> Result<bool> {
        self.customers.exists(username)
    }

    /// Returns the customer if `username` and `password` match a record.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Customer>> {
        self.customers.find_by_credentials(username, password)
    }

    /// Checks the username is free, then appends the profile.
    ///
    /// Empty usernames and passwords are never stored.
    pub fn register_customer(&self, customer: &Customer) -> Result<()> {
        if customer.username.is_empty() || customer.password.is_empty() {
            return Err(BankError::EmptyField);
        }
        if self.customers.exists(&customer.username)? {
            return Err(BankError::UsernameTaken);
        }
        self.customers.insert(customer)?;
        info!("Registered customer '{}'", customer.username);
        Ok(())
    }

    pub fn has_account(&self, username: &str, kind: AccountKind) -> Result<bool> {
        self.accounts.exists_for_owner(username, kind)
    }

    pub fn load_accounts(&self, username: &str) -> Result<OwnerAccounts> {
        self.accounts.load_for_owner(username)
    }

    /// Creates an account of `kind` unless the owner already has one.
    pub fn create_account(&self, kind: AccountKind, username: &str) -> Result<Account> {
        if self.accounts.exists_for_owner(username, kind)? {
            return Err(BankError::AccountExists(kind));
        }
        let account = self
            .accounts
            .insert(kind, username, &mut rand::thread_rng())?;
        info!("Created {} account {} for '{}'", kind, account.id, username);
        Ok(account)
    }

    /// Writes the account's current fields over its stored record.
    pub fn persist_account(&self, account: &Account) -> Result<()> {
        self.accounts.update(account)
    }
}
