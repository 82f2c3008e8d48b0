//! Customer repository over the customer record file.
//!
//! Every call opens the file in a single mode, scans or appends, and closes
//! it before returning. Nothing is cached between calls.

use crate::codec;
use crate::customer::Customer;
use crate::error::Result;
use log::{debug, warn};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Reads and appends customer records.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    path: PathBuf,
}

impl CustomerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CustomerStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if any record carries `username`. Empty input never
    /// matches.
    pub fn exists(&self, username: &str) -> Result<bool> {
        if username.is_empty() {
            return Ok(false);
        }
        Ok(self.find(|c| c.username == username)?.is_some())
    }

    /// Returns the first record whose username and password both match
    /// exactly.
    ///
    /// Empty credentials never match, even against a record stored with an
    /// empty field.
    pub fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<Customer>> {
        if username.is_empty() || password.is_empty() {
            return Ok(None);
        }
        self.find(|c| c.username == username && c.password == password)
    }

    /// Appends one record.
    ///
    /// Uniqueness is not checked here; see [`crate::Bank::register_customer`].
    pub fn insert(&self, customer: &Customer) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = codec::writer(file);
        writer.write_record(&codec::encode_customer(customer))?;
        writer.flush()?;

        debug!("Appended customer '{}'", customer.username);
        Ok(())
    }

    /// Scans until the first record satisfying `predicate`.
    fn find<F>(&self, predicate: F) -> Result<Option<Customer>>
    where
        F: Fn(&Customer) -> bool,
    {
        let Some(mut reader) = codec::open_reader(&self.path)? else {
            return Ok(None);
        };

        for result in reader.records() {
            match result {
                Ok(record) => {
                    let customer = codec::decode_customer(&record);
                    if predicate(&customer) {
                        return Ok(Some(customer));
                    }
                }
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => warn!("{}: skipping unreadable record: {}", self.path.display(), e),
            }
        }

        Ok(None)
    }
}
