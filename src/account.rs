//! Account entities: a shared base record with a kind-specific payload.
//!
//! The entity methods apply arithmetic without any policy checks. They fail
//! only when a value would leave its range, and then leave the account as it
//! was. Amount validation and the overdraft policy live in [`crate::teller`].

use crate::decimal::Amount;
use crate::error::{BankError, Result};
use std::fmt;

/// The two account variants, tagged in the account file as `Checking` and
/// `Saving`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountKind {
    Checking,
    Savings,
}

impl AccountKind {
    /// The leading field of an account record.
    pub fn tag(self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Saving",
        }
    }

    /// Parses a record tag. Tags are case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Checking" => Some(AccountKind::Checking),
            "Saving" => Some(AccountKind::Savings),
            _ => None,
        }
    }

    /// Terms assigned to a freshly created account of this kind.
    pub fn default_terms(self) -> AccountTerms {
        match self {
            AccountKind::Checking => AccountTerms::Checking {
                overdraft_limit: Amount::from_int(25),
            },
            AccountKind::Savings => AccountTerms::Savings {
                interest_rate: Amount::from_parts(5, 2),
            },
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kind-specific parameters of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountTerms {
    /// Savings accrue `balance * interest_rate` on each login.
    Savings { interest_rate: Amount },

    /// Checking may dip to `-overdraft_limit`.
    Checking { overdraft_limit: Amount },
}

impl AccountTerms {
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountTerms::Savings { .. } => AccountKind::Savings,
            AccountTerms::Checking { .. } => AccountKind::Checking,
        }
    }

    /// The value stored in the fourth field of the record.
    pub fn parameter(&self) -> Amount {
        match *self {
            AccountTerms::Savings { interest_rate } => interest_rate,
            AccountTerms::Checking { overdraft_limit } => overdraft_limit,
        }
    }

    /// Rebuilds terms of `kind` from the stored parameter field.
    pub fn with_parameter(kind: AccountKind, parameter: Amount) -> Self {
        match kind {
            AccountKind::Savings => AccountTerms::Savings {
                interest_rate: parameter,
            },
            AccountKind::Checking => AccountTerms::Checking {
                overdraft_limit: parameter,
            },
        }
    }
}

/// A checking or savings account owned by one customer.
///
/// # Invariants
///
/// - `deposit_count` and `withdrawal_count` only ever increase
/// - A persisted account has an id in `100000..=999999`; id `0` means
///   "not loaded" and is never generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Username of the owning customer.
    pub owner: String,

    /// Current balance. Only checking accounts go negative, via overdraft.
    pub balance: Amount,

    /// Six-digit random identifier assigned at creation.
    pub id: u32,

    /// Number of successful deposits.
    pub deposit_count: u32,

    /// Number of successful withdrawals.
    pub withdrawal_count: u32,

    pub terms: AccountTerms,
}

impl Account {
    /// Sentinel id for an account that was never loaded.
    pub const UNLOADED_ID: u32 = 0;

    /// Lowest generated id.
    pub const MIN_ID: u32 = 100_000;

    /// Highest generated id.
    pub const MAX_ID: u32 = 999_999;

    /// Creates a zero-balance account of `kind` with the default terms.
    pub fn open(kind: AccountKind, owner: &str, id: u32) -> Self {
        Account {
            owner: owner.to_string(),
            balance: Amount::ZERO,
            id,
            deposit_count: 0,
            withdrawal_count: 0,
            terms: kind.default_terms(),
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.terms.kind()
    }

    /// Returns `false` for the sentinel id.
    pub fn is_loaded(&self) -> bool {
        self.id != Self::UNLOADED_ID
    }

    /// Overdraft limit, for checking accounts.
    pub fn overdraft_limit(&self) -> Option<Amount> {
        match self.terms {
            AccountTerms::Checking { overdraft_limit } => Some(overdraft_limit),
            AccountTerms::Savings { .. } => None,
        }
    }

    /// Interest rate, for savings accounts.
    pub fn interest_rate(&self) -> Option<Amount> {
        match self.terms {
            AccountTerms::Savings { interest_rate } => Some(interest_rate),
            AccountTerms::Checking { .. } => None,
        }
    }

    /// Adds `amount` to the balance and counts the deposit.
    pub fn deposit(&mut self, amount: Amount) -> Result<()> {
        let balance = self.balance.checked_add(amount).ok_or(BALANCE_OVERFLOW)?;
        let count = self
            .deposit_count
            .checked_add(1)
            .ok_or(BankError::Overflow("Deposit count"))?;
        self.balance = balance;
        self.deposit_count = count;
        Ok(())
    }

    /// Subtracts `amount` from the balance and counts the withdrawal.
    ///
    /// No funds check is made here; see [`crate::teller::withdraw`].
    pub fn withdraw(&mut self, amount: Amount) -> Result<()> {
        let balance = self.balance.checked_sub(amount).ok_or(BALANCE_OVERFLOW)?;
        let count = self
            .withdrawal_count
            .checked_add(1)
            .ok_or(BankError::Overflow("Withdrawal count"))?;
        self.balance = balance;
        self.withdrawal_count = count;
        Ok(())
    }

    /// Deducts a service fee. Fees are not counted as withdrawals.
    pub fn charge_fee(&mut self, fee: Amount) -> Result<()> {
        self.balance = self.balance.checked_sub(fee).ok_or(BALANCE_OVERFLOW)?;
        Ok(())
    }

    /// Applies one interest period: `balance *= 1 + interest_rate`.
    ///
    /// Counters are untouched. Checking accounts earn nothing.
    pub fn pay_interest(&mut self) -> Result<()> {
        if let AccountTerms::Savings { interest_rate } = self.terms {
            self.balance = Amount::from_int(1)
                .checked_add(interest_rate)
                .and_then(|factor| self.balance.checked_mul(factor))
                .ok_or(BALANCE_OVERFLOW)?;
        }
        Ok(())
    }
}

const BALANCE_OVERFLOW: BankError = BankError::Overflow("Balance");
