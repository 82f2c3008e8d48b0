//! Account repository over the account record file.
//!
//! Lookups scan the whole file. Updates use the rewrite protocol: every
//! line is streamed into a temporary file beside the original, the target
//! record is substituted with the in-memory account, and the temporary file
//! then replaces the original in a single rename. An update therefore costs
//! one pass over every stored account.

use crate::account::{Account, AccountKind};
use crate::codec;
use crate::error::{BankError, Result};
use csv::StringRecord;
use log::{debug, warn};
use rand::Rng;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Accounts found for one owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerAccounts {
    pub checking: Option<Account>,
    pub savings: Option<Account>,
}

impl OwnerAccounts {
    pub fn get(&self, kind: AccountKind) -> Option<&Account> {
        match kind {
            AccountKind::Checking => self.checking.as_ref(),
            AccountKind::Savings => self.savings.as_ref(),
        }
    }

    pub fn get_mut(&mut self, kind: AccountKind) -> Option<&mut Account> {
        self.slot(kind).as_mut()
    }

    /// Stores `account` in the slot for its kind, replacing any previous one.
    pub fn set(&mut self, account: Account) {
        let kind = account.kind();
        *self.slot(kind) = Some(account);
    }

    fn slot(&mut self, kind: AccountKind) -> &mut Option<Account> {
        match kind {
            AccountKind::Checking => &mut self.checking,
            AccountKind::Savings => &mut self.savings,
        }
    }
}

/// Reads, appends and rewrites account records.
#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AccountStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if any record matches both `username` and `kind`.
    pub fn exists_for_owner(&self, username: &str, kind: AccountKind) -> Result<bool> {
        let mut exists = false;
        self.scan(|record| {
            if codec::account_key(&record) == (Some(kind), username) {
                exists = true;
            }
        })?;
        Ok(exists)
    }

    /// Loads every account owned by `username` in one full scan.
    ///
    /// If the file holds several records of the same kind for the owner, the
    /// last one scanned wins. Records carrying the unloaded sentinel id are
    /// treated as absent and malformed lines are skipped.
    pub fn load_for_owner(&self, username: &str) -> Result<OwnerAccounts> {
        let mut accounts = OwnerAccounts::default();
        let path = &self.path;

        self.scan(|record| {
            if codec::account_key(&record).1 != username {
                return;
            }
            match codec::decode_account(&record) {
                Ok(account) if !account.is_loaded() => {
                    debug!(
                        "{}: ignoring {} record for '{}' with unloaded id",
                        path.display(),
                        account.kind(),
                        username
                    );
                }
                Ok(account) => accounts.set(account),
                Err(e) => warn!("{}: skipping record: {}", path.display(), e),
            }
        })?;

        Ok(accounts)
    }

    /// Creates and appends a new account of `kind` for `owner`.
    ///
    /// The id is drawn uniformly from `100000..=999999`, redrawing while it
    /// collides with a stored account. Whether the owner already holds an
    /// account of this kind is not checked; see
    /// [`crate::Bank::create_account`].
    pub fn insert<R: Rng>(
        &self,
        kind: AccountKind,
        owner: &str,
        rng: &mut R,
    ) -> Result<Account> {
        let used = self.used_ids()?;
        let id = loop {
            let candidate = rng.gen_range(Account::MIN_ID..=Account::MAX_ID);
            if !used.contains(&candidate) {
                break candidate;
            }
            debug!("Account id {} already in use, redrawing", candidate);
        };

        let account = Account::open(kind, owner, id);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = codec::writer(file);
        writer.write_record(&codec::encode_account(&account))?;
        writer.flush()?;

        debug!("Appended {} account {} for '{}'", kind, id, owner);
        Ok(account)
    }

    /// Persists `account` by rewriting the whole file.
    ///
    /// Every record matching the account's owner and kind is replaced by the
    /// in-memory values. All other records are decoded and re-encoded, so
    /// their numeric text comes out normalized. Lines that cannot be decoded
    /// are written back field for field.
    ///
    /// Returns [`BankError::FileRewrite`] if the rewritten file cannot be
    /// moved over the original. There is no retry.
    pub fn update(&self, account: &Account) -> Result<()> {
        let temp_path = self.temp_path();

        let replaced = match self.write_rewrite(&temp_path, account) {
            Ok(replaced) => replaced,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        self.replace_with(&temp_path)?;

        if replaced == 0 {
            warn!(
                "{}: no {} record for '{}' to update",
                self.path.display(),
                account.kind(),
                account.owner
            );
        } else {
            debug!(
                "Rewrote {} replacing {} {} record(s) for '{}'",
                self.path.display(),
                replaced,
                account.kind(),
                account.owner
            );
        }
        Ok(())
    }

    /// Streams the current file into `temp_path`, substituting `account`.
    /// Returns how many records were substituted.
    fn write_rewrite(&self, temp_path: &Path, account: &Account) -> Result<usize> {
        let mut file = File::create(temp_path)?;
        let mut replaced = 0;
        let target = (Some(account.kind()), account.owner.as_str());

        {
            let mut out = codec::writer(&mut file);
            if let Some(mut reader) = codec::open_reader(&self.path)? {
                for result in reader.byte_records() {
                    let raw = result?;
                    let record = match StringRecord::from_byte_record(raw) {
                        Ok(record) => record,
                        Err(e) => {
                            warn!("{}: keeping non-UTF-8 record as-is", self.path.display());
                            out.write_byte_record(&e.into_byte_record())?;
                            continue;
                        }
                    };

                    if codec::account_key(&record) == target {
                        out.write_record(&codec::encode_account(account))?;
                        replaced += 1;
                        continue;
                    }

                    match codec::decode_account(&record) {
                        Ok(other) => out.write_record(&codec::encode_account(&other))?,
                        Err(e) => {
                            warn!("{}: keeping record as-is: {}", self.path.display(), e);
                            out.write_record(&record)?;
                        }
                    }
                }
            }
            out.flush()?;
        }

        file.sync_all()?;
        Ok(replaced)
    }

    /// Moves the staged rewrite over the original in one rename. On failure
    /// the staged file is removed and the original is left as it was.
    fn replace_with(&self, temp_path: &Path) -> Result<()> {
        fs::rename(temp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(temp_path);
            BankError::FileRewrite {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Ids of every decodable stored account.
    fn used_ids(&self) -> Result<HashSet<u32>> {
        let mut ids = HashSet::new();
        self.scan(|record| {
            if let Ok(account) = codec::decode_account(&record) {
                ids.insert(account.id);
            }
        })?;
        Ok(ids)
    }

    /// Sibling path the rewrite is staged in.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("accounts"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Visits every readable record. A missing file has no records.
    fn scan<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(StringRecord),
    {
        let Some(mut reader) = codec::open_reader(&self.path)? else {
            return Ok(());
        };

        for result in reader.records() {
            match result {
                Ok(record) => visit(record),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => warn!("{}: skipping unreadable record: {}", self.path.display(), e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Amount;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn store_with(contents: &str) -> (tempfile::TempDir, AccountStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("userAccountData.txt");
        fs::write(&path, contents).unwrap();
        (dir, AccountStore::new(path))
    }

    #[test]
    fn test_exists_matches_owner_and_kind() {
        let (_dir, store) = store_with("Checking:alice:0:25:111111:0:0:\n");

        assert!(store.exists_for_owner("alice", AccountKind::Checking).unwrap());
        assert!(!store.exists_for_owner("alice", AccountKind::Savings).unwrap());
        assert!(!store.exists_for_owner("bob", AccountKind::Checking).unwrap());
    }

    #[test]
    fn test_missing_file_has_no_accounts() {
        let dir = tempfile::tempdir().unwrap();
        let store = AccountStore::new(dir.path().join("userAccountData.txt"));

        assert!(!store.exists_for_owner("alice", AccountKind::Checking).unwrap());
        assert_eq!(store.load_for_owner("alice").unwrap(), OwnerAccounts::default());
    }

    #[test]
    fn test_load_last_duplicate_wins() {
        let (_dir, store) = store_with(
            "Saving:alice:10:0.05:111111:1:0:\n\
             Checking:bob:3:25:222222:1:0:\n\
             Saving:alice:20:0.05:333333:2:0:\n",
        );

        let accounts = store.load_for_owner("alice").unwrap();
        let savings = accounts.savings.unwrap();
        assert_eq!(savings.id, 333333);
        assert_eq!(savings.balance, amt("20"));
        assert!(accounts.checking.is_none());
    }

    #[test]
    fn test_load_skips_sentinel_and_malformed_records() {
        let (_dir, store) = store_with(
            "Checking:alice:0:25:0:0:0:\n\
             Saving:alice:oops:0.05:111111:0:0:\n\
             Saving:alice:7.5:0.05:222222:1:0:\n",
        );

        let accounts = store.load_for_owner("alice").unwrap();
        assert!(accounts.checking.is_none());
        assert_eq!(accounts.savings.unwrap().balance, amt("7.5"));
    }

    #[test]
    fn test_insert_assigns_defaults_and_six_digit_id() {
        let (_dir, store) = store_with("");
        let mut rng = StdRng::seed_from_u64(7);

        let checking = store.insert(AccountKind::Checking, "alice", &mut rng).unwrap();
        assert!((Account::MIN_ID..=Account::MAX_ID).contains(&checking.id));
        assert_eq!(checking.overdraft_limit(), Some(amt("25")));

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            format!("Checking:alice:0:25:{}:0:0:\n", checking.id)
        );
    }

    #[test]
    fn test_insert_redraws_used_ids() {
        let mut preview = StdRng::seed_from_u64(42);
        let first = preview.gen_range(Account::MIN_ID..=Account::MAX_ID);

        let (_dir, store) = store_with(&format!("Saving:bob:0:0.05:{}:0:0:\n", first));
        let mut rng = StdRng::seed_from_u64(42);
        let account = store.insert(AccountKind::Savings, "alice", &mut rng).unwrap();

        assert_ne!(account.id, first);
    }

    #[test]
    fn test_update_replaces_only_target() {
        let (_dir, store) = store_with(
            "Checking:alice:10:25:111111:1:0:\n\
             Saving:alice:50:0.05:222222:1:0:\n\
             Checking:bob:5.50:25:333333:1:0:\n",
        );

        let mut accounts = store.load_for_owner("alice").unwrap();
        let checking = accounts.get_mut(AccountKind::Checking).unwrap();
        checking.deposit(amt("2.5")).unwrap();
        store.update(checking).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "Checking:alice:12.5:25:111111:2:0:\n\
             Saving:alice:50:0.05:222222:1:0:\n\
             Checking:bob:5.5:25:333333:1:0:\n"
        );
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_update_keeps_malformed_lines() {
        let (_dir, store) = store_with(
            "Loan:carol:1:2:3:4:5:\n\
             Checking:alice:10:25:111111:1:0:\n",
        );

        let mut checking = store.load_for_owner("alice").unwrap().checking.unwrap();
        checking.withdraw(amt("1")).unwrap();
        store.update(&checking).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "Loan:carol:1:2:3:4:5:\n\
             Checking:alice:9:25:111111:1:1:\n"
        );
    }

    #[test]
    fn test_update_without_match_leaves_records() {
        let (_dir, store) = store_with("Checking:bob:1:25:333333:1:0:\n");
        let ghost = Account::open(AccountKind::Savings, "alice", 123456);

        store.update(&ghost).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "Checking:bob:1:25:333333:1:0:\n"
        );
    }

    #[test]
    fn test_set_replaces_slot_of_same_kind() {
        let mut accounts = OwnerAccounts::default();
        accounts.set(Account::open(AccountKind::Savings, "alice", 111111));
        accounts.set(Account::open(AccountKind::Savings, "alice", 222222));
        accounts.set(Account::open(AccountKind::Checking, "alice", 333333));

        assert_eq!(accounts.get(AccountKind::Savings).unwrap().id, 222222);
        assert_eq!(accounts.get(AccountKind::Checking).unwrap().id, 333333);
    }

    #[test]
    fn test_update_failure_while_staging_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        // Reading a directory as records fails before anything is renamed.
        let path = dir.path().join("userAccountData.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let store = AccountStore::new(&path);

        let account = Account::open(AccountKind::Checking, "alice", 123456);
        assert!(store.update(&account).is_err());
        assert!(path.join("keep").exists());
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_failed_rename_is_file_rewrite_error() {
        let dir = tempfile::tempdir().unwrap();
        // A file cannot be renamed over a non-empty directory.
        let path = dir.path().join("userAccountData.txt");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let store = AccountStore::new(&path);

        let staged = store.temp_path();
        fs::write(&staged, "Checking:alice:0:25:123456:0:0:\n").unwrap();

        match store.replace_with(&staged) {
            Err(BankError::FileRewrite { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("Expected FileRewrite, got {:?}", other),
        }
        assert!(path.join("keep").exists());
        assert!(!staged.exists());
    }
}
