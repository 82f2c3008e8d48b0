//! # Project Bank
//!
//! A console banking application that keeps customers and their checking
//! and savings accounts in two colon-delimited flat files.
//!
//! ## Design Principles
//!
//! - **Flat-file records**: one `:`-joined record per line, no index
//! - **Whole-file rewrite**: every account update streams the full account
//!   file into a temporary copy that replaces the original in one rename
//! - **No caching**: each store call opens, scans or appends, and closes
//! - **Fixed-point amounts**: balances and rates via `rust_decimal`
//!
//! ## Example
//!
//! ```no_run
//! use project_bank::{AccountKind, Bank, Session, StoreConfig};
//! use std::str::FromStr;
//!
//! let bank = Bank::open(&StoreConfig::default());
//! if let Some(mut session) = Session::login(&bank, "alice", "Secret#12").unwrap() {
//!     let amount = project_bank::Amount::from_str("25").unwrap();
//!     session.deposit(AccountKind::Checking, amount).unwrap();
//! }
//! ```

pub mod account;
pub mod account_store;
pub mod bank;
pub mod codec;
pub mod config;
pub mod console;
pub mod customer;
pub mod customer_store;
pub mod decimal;
pub mod error;
pub mod password;
pub mod session;
pub mod teller;

pub use account::{Account, AccountKind, AccountTerms};
pub use account_store::{AccountStore, OwnerAccounts};
pub use bank::Bank;
pub use config::StoreConfig;
pub use console::Console;
pub use customer::Customer;
pub use customer_store::CustomerStore;
pub use decimal::Amount;
pub use error::{BankError, Result};
pub use password::PasswordRule;
pub use session::Session;
pub use teller::Withdrawal;
