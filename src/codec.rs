//! Colon-delimited record codec shared by both record files.
//!
//! Every record is one line of fields joined by `:` with a trailing `:`
//! before the newline:
//!
//! ```text
//! username:firstName:lastName:address:phoneNum:email:password:
//! Saving:username:balance:interestRate:id:depositCount:withdrawalCount:
//! Checking:username:balance:overdraftLimit:id:depositCount:withdrawalCount:
//! ```
//!
//! There is no escaping. A value containing `:` shifts every later field of
//! its record, so callers must keep the delimiter out of stored values.

use crate::account::{Account, AccountKind, AccountTerms};
use crate::customer::Customer;
use crate::decimal::Amount;
use crate::error::{BankError, Result};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Field separator of both record files.
pub const DELIMITER: u8 = b':';

/// Number of fields in an account record, excluding the trailing empty one.
const ACCOUNT_FIELDS: usize = 7;

/// Builds a record reader over `input`.
///
/// Blank lines are skipped and records may have any number of fields.
pub fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input)
}

/// Builds a record writer over `output`. Each record ends with `\n`.
pub fn writer<W: Write>(output: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output)
}

/// Opens a record file for reading. A missing file yields `None`.
pub fn open_reader(path: &Path) -> Result<Option<csv::Reader<File>>> {
    match File::open(path) {
        Ok(file) => Ok(Some(reader(file))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// 1-based ordinal of a record in its file, or 0 if unknown.
///
/// Blank lines are not records and are not counted.
pub fn record_number(record: &StringRecord) -> u64 {
    record.position().map_or(0, |p| p.record() + 1)
}

/// Field `idx`, or the empty string when the line ends early.
fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// Appends the empty field that produces the trailing delimiter.
fn terminate(mut record: StringRecord) -> StringRecord {
    record.push_field("");
    record
}

pub fn encode_customer(customer: &Customer) -> StringRecord {
    let mut record = StringRecord::from(customer.profile_fields().to_vec());
    record.push_field(&customer.password);
    terminate(record)
}

/// Decodes a customer line. Missing fields decode as empty strings.
pub fn decode_customer(record: &StringRecord) -> Customer {
    Customer {
        username: field(record, 0).to_string(),
        first_name: field(record, 1).to_string(),
        last_name: field(record, 2).to_string(),
        address: field(record, 3).to_string(),
        phone_num: field(record, 4).to_string(),
        email: field(record, 5).to_string(),
        password: field(record, 6).to_string(),
    }
}

pub fn encode_account(account: &Account) -> StringRecord {
    let record = StringRecord::from(vec![
        account.kind().tag().to_string(),
        account.owner.clone(),
        account.balance.to_string(),
        account.terms.parameter().to_string(),
        account.id.to_string(),
        account.deposit_count.to_string(),
        account.withdrawal_count.to_string(),
    ]);
    terminate(record)
}

/// Reads the tag and owner of an account line without decoding the rest.
///
/// Returns `None` for the kind when the tag is not recognised.
pub fn account_key(record: &StringRecord) -> (Option<AccountKind>, &str) {
    (AccountKind::from_tag(field(record, 0)), field(record, 1))
}

/// Decodes a full account line.
pub fn decode_account(record: &StringRecord) -> Result<Account> {
    let number = record_number(record);
    let malformed = |message: String| BankError::MalformedRecord {
        record: number,
        message,
    };

    let tag = field(record, 0);
    let kind = AccountKind::from_tag(tag)
        .ok_or_else(|| malformed(format!("unknown account type '{}'", tag)))?;

    if record.len() < ACCOUNT_FIELDS {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            ACCOUNT_FIELDS,
            record.len()
        )));
    }

    let amount = |idx: usize, name: &str| {
        Amount::from_str(field(record, idx))
            .map_err(|_| malformed(format!("invalid {} '{}'", name, field(record, idx))))
    };
    let integer = |idx: usize, name: &str| {
        field(record, idx)
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed(format!("invalid {} '{}'", name, field(record, idx))))
    };

    Ok(Account {
        owner: field(record, 1).to_string(),
        balance: amount(2, "balance")?,
        terms: AccountTerms::with_parameter(kind, amount(3, "rate or limit")?),
        id: integer(4, "id")?,
        deposit_count: integer(5, "deposit count")?,
        withdrawal_count: integer(6, "withdrawal count")?,
    })
}
