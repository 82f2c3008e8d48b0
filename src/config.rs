//! Locations of the record files.

use std::env;
use std::path::{Path, PathBuf};

/// Default customer file name.
pub const CUSTOMER_FILE: &str = "userData.txt";

/// Default account file name.
pub const ACCOUNT_FILE: &str = "userAccountData.txt";

/// Environment variable overriding the customer file path.
pub const CUSTOMER_FILE_ENV: &str = "BANK_CUSTOMER_FILE";

/// Environment variable overriding the account file path.
pub const ACCOUNT_FILE_ENV: &str = "BANK_ACCOUNT_FILE";

/// Paths handed to the record stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub customer_path: PathBuf,
    pub account_path: PathBuf,
}

impl StoreConfig {
    /// Default file names resolved inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        StoreConfig {
            customer_path: dir.join(CUSTOMER_FILE),
            account_path: dir.join(ACCOUNT_FILE),
        }
    }

    /// Applies `BANK_CUSTOMER_FILE` / `BANK_ACCOUNT_FILE` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            env::var_os(CUSTOMER_FILE_ENV).map(PathBuf::from),
            env::var_os(ACCOUNT_FILE_ENV).map(PathBuf::from),
        )
    }

    /// Defaults in the working directory, then environment overrides.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_overrides(mut self, customer: Option<PathBuf>, account: Option<PathBuf>) -> Self {
        if let Some(path) = customer.filter(|p| !p.as_os_str().is_empty()) {
            self.customer_path = path;
        }
        if let Some(path) = account.filter(|p| !p.as_os_str().is_empty()) {
            self.account_path = path;
        }
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            customer_path: PathBuf::from(CUSTOMER_FILE),
            account_path: PathBuf::from(ACCOUNT_FILE),
        }
    }
}
