//! Error types for the bank record stores and session layer.

use crate::account::AccountKind;
use crate::password::PasswordRule;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for bank operations
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur while reading, writing or mutating records.
#[derive(Error, Debug)]
pub enum BankError {
    /// Failed to open, read or write a record file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited record error
    #[error("Record file error: {0}")]
    Csv(#[from] csv::Error),

    /// Replacing the account file with its rewritten copy failed
    #[error("File handling error while replacing {}: {source}", .path.display())]
    FileRewrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be decoded. `record` is its 1-based ordinal.
    #[error("Malformed record #{record}: {message}")]
    MalformedRecord { record: u64, message: String },

    /// Sign-up with a username that already has a profile
    #[error("Profile already exists")]
    UsernameTaken,

    /// A required field was left blank
    #[error("Fields cannot be blank")]
    EmptyField,

    /// A field contains the record delimiter
    #[error("Fields cannot contain ':'")]
    InvalidInput,

    /// Password does not satisfy every rule
    #[error("Password rejected: {}", describe_rules(.0))]
    WeakPassword(Vec<PasswordRule>),

    /// The owner already holds an account of this kind
    #[error("{0} account already created")]
    AccountExists(AccountKind),

    /// No account of this kind is loaded for the owner
    #[error("No {} account found", .0.to_string().to_lowercase())]
    NoAccount(AccountKind),

    /// Deposit or withdrawal amount not greater than zero
    #[error("Amount must be greater than $0")]
    InvalidAmount,

    /// Withdrawal would exceed the balance or overdraft limit
    #[error("Insufficient Balance")]
    InsufficientFunds,

    /// A balance or counter would leave its representable range
    #[error("{0} out of range")]
    Overflow(&'static str),
}

fn describe_rules(rules: &[PasswordRule]) -> String {
    rules
        .iter()
        .map(|rule| rule.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
