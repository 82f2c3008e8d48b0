//! A logged-in customer and the accounts loaded for them.
//!
//! Every mutation is written through [`Bank::persist_account`] before the
//! call returns, so the files always reflect the in-memory accounts.

use crate::account::{Account, AccountKind};
use crate::account_store::OwnerAccounts;
use crate::bank::Bank;
use crate::codec::DELIMITER;
use crate::customer::Customer;
use crate::decimal::Amount;
use crate::error::{BankError, Result};
use crate::password;
use crate::teller::{self, Withdrawal};
use log::{debug, info, warn};

/// Validates a new profile and registers it.
///
/// Every field must be non-empty and free of the record delimiter, and the
/// password must pass [`password::check`] against `confirmation`.
pub fn sign_up(bank: &Bank, profile: Customer, confirmation: &str) -> Result<Customer> {
    let fields = profile.profile_fields();
    if fields.iter().any(|f| f.is_empty()) {
        return Err(BankError::EmptyField);
    }
    let delimiter = char::from(DELIMITER);
    if fields.iter().any(|f| f.contains(delimiter)) || profile.password.contains(delimiter) {
        return Err(BankError::InvalidInput);
    }

    let failed = password::check(&profile.password, confirmation);
    if !failed.is_empty() {
        return Err(BankError::WeakPassword(failed));
    }

    bank.register_customer(&profile)?;
    Ok(profile)
}

/// State held between login and logout.
#[derive(Debug)]
pub struct Session<'a> {
    bank: &'a Bank,
    customer: Customer,
    accounts: OwnerAccounts,
}

impl<'a> Session<'a> {
    /// Authenticates and loads the customer's accounts.
    ///
    /// A loaded savings account is paid one period of interest, persisted
    /// immediately. Interest that would overflow the balance is skipped so
    /// the account stays reachable. Returns `None` when the credentials do
    /// not match.
    pub fn login(bank: &'a Bank, username: &str, password: &str) -> Result<Option<Self>> {
        let Some(customer) = bank.authenticate(username, password)? else {
            debug!("Login failed for '{}'", username);
            return Ok(None);
        };

        let mut accounts = bank.load_accounts(&customer.username)?;
        if let Some(savings) = accounts.savings.as_mut() {
            match savings.pay_interest() {
                Ok(()) => {
                    bank.persist_account(savings)?;
                    debug!(
                        "Paid interest on savings {}, balance now {}",
                        savings.id, savings.balance
                    );
                }
                Err(e) => warn!("Interest not paid on savings {}: {}", savings.id, e),
            }
        }

        info!("'{}' logged in", customer.username);
        Ok(Some(Session {
            bank,
            customer,
            accounts,
        }))
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn account(&self, kind: AccountKind) -> Option<&Account> {
        self.accounts.get(kind)
    }

    /// Opens a new account of `kind` unless one is already on file.
    pub fn create_account(&mut self, kind: AccountKind) -> Result<&Account> {
        let account = self.bank.create_account(kind, &self.customer.username)?;
        self.accounts.set(account);
        self.account(kind).ok_or(BankError::NoAccount(kind))
    }

    /// Deposits into the loaded account of `kind` and persists it.
    pub fn deposit(&mut self, kind: AccountKind, amount: Amount) -> Result<Amount> {
        let account = self
            .accounts
            .get_mut(kind)
            .ok_or(BankError::NoAccount(kind))?;

        let mut updated = account.clone();
        let balance = teller::deposit(&mut updated, amount)?;
        self.bank.persist_account(&updated)?;
        *account = updated;
        Ok(balance)
    }

    /// Withdraws from the loaded account of `kind` and persists it.
    pub fn withdraw(&mut self, kind: AccountKind, amount: Amount) -> Result<Withdrawal> {
        let account = self
            .accounts
            .get_mut(kind)
            .ok_or(BankError::NoAccount(kind))?;

        let mut updated = account.clone();
        let receipt = teller::withdraw(&mut updated, amount)?;
        self.bank.persist_account(&updated)?;
        *account = updated;
        Ok(receipt)
    }

    /// Ends the session, returning the customer that was logged in.
    pub fn logout(self) -> Customer {
        info!("'{}' logged out", self.customer.username);
        self.customer
    }
}
