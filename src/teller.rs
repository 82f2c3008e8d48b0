//! Deposit and withdrawal policy applied before touching an account.
//!
//! [`Account::deposit`] and [`Account::withdraw`] never refuse. The checks
//! here decide whether a request may proceed and whether the overdraft fee
//! applies.

use crate::account::{Account, AccountTerms};
use crate::decimal::Amount;
use crate::error::{BankError, Result};
use log::debug;

/// Flat fee charged when a checking withdrawal leaves the balance negative.
pub const OVERDRAFT_FEE: i64 = 5;

/// Outcome of an accepted withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// Amount withdrawn, excluding any fee.
    pub amount: Amount,

    /// Overdraft fee charged, zero when none applied.
    pub fee: Amount,

    /// Balance after the withdrawal and fee.
    pub balance: Amount,
}

impl Withdrawal {
    pub fn fee_charged(&self) -> bool {
        !self.fee.is_zero()
    }
}

/// Deposits `amount` if it is greater than zero.
pub fn deposit(account: &mut Account, amount: Amount) -> Result<Amount> {
    if !amount.is_positive() {
        return Err(BankError::InvalidAmount);
    }
    account.deposit(amount)?;
    Ok(account.balance)
}

/// Withdraws `amount` under the account's funds policy.
///
/// - Savings: the balance may not go below zero.
/// - Checking: the balance may go below zero as long as it stays at or above
///   `-overdraft_limit`, in which case [`OVERDRAFT_FEE`] is charged after the
///   withdrawal.
///
/// A rejected withdrawal, or one whose result would leave the representable
/// range, leaves the account unchanged.
pub fn withdraw(account: &mut Account, amount: Amount) -> Result<Withdrawal> {
    if !amount.is_positive() {
        return Err(BankError::InvalidAmount);
    }

    let remaining = account
        .balance
        .checked_sub(amount)
        .ok_or(BankError::Overflow("Balance"))?;
    let fee = if !remaining.is_negative() {
        Amount::ZERO
    } else {
        match account.terms {
            AccountTerms::Checking { overdraft_limit } if remaining >= -overdraft_limit => {
                Amount::from_int(OVERDRAFT_FEE)
            }
            _ => return Err(BankError::InsufficientFunds),
        }
    };

    let mut updated = account.clone();
    updated.withdraw(amount)?;
    if !fee.is_zero() {
        updated.charge_fee(fee)?;
        debug!(
            "Overdraft on {} account {}: fee {} charged",
            updated.kind(),
            updated.id,
            fee
        );
    }
    *account = updated;

    Ok(Withdrawal {
        amount,
        fee,
        balance: account.balance,
    })
}
