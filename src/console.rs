//! Line-oriented menu front end over a [`Bank`].
//!
//! Reads one answer per line from any `BufRead` and writes prompts to any
//! `Write`, so the same loop drives stdin/stdout and scripted tests. End of
//! input leaves the loop cleanly from any prompt.

use crate::account::{Account, AccountKind};
use crate::bank::Bank;
use crate::codec::DELIMITER;
use crate::customer::Customer;
use crate::decimal::Amount;
use crate::error::{BankError, Result};
use crate::password;
use crate::session::{self, Session};
use std::io::{BufRead, Write};
use std::str::FromStr;

/// Width of the label column in account and profile listings.
const LABEL_WIDTH: usize = 30;

/// Result of an account sub-menu.
enum Pick {
    Account(AccountKind),
    Cancel,
}

/// The interactive menu loop.
pub struct Console<'a, R, W> {
    bank: &'a Bank,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(bank: &'a Bank, input: R, output: W) -> Self {
        Console {
            bank,
            input,
            output,
        }
    }

    /// Runs until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "Welcome to the Project Bank\n")?;
            let Some(choice) = self.select(&["Login", "Create Profile", "Exit Program"])? else {
                return Ok(());
            };

            let flow = match choice {
                1 => self.login()?,
                2 => self.sign_up()?,
                _ => None,
            };
            if flow.is_none() {
                return Ok(());
            }
        }
    }

    /// Returns `None` once input has ended.
    fn login(&mut self) -> Result<Option<()>> {
        let Some(username) = self.prompt("Username: ")? else {
            return Ok(None);
        };
        let Some(password) = self.prompt("Password: ")? else {
            return Ok(None);
        };

        let bank = self.bank;
        match Session::login(bank, &username, &password) {
            Ok(Some(session)) => {
                writeln!(self.output, "\nSuccessfully logged in\n")?;
                self.logged_in(session)
            }
            Ok(None) => {
                writeln!(self.output, "\nLogin failed\n")?;
                Ok(Some(()))
            }
            Err(e) => {
                writeln!(self.output, "\nError: {}\n", e)?;
                Ok(Some(()))
            }
        }
    }

    fn logged_in(&mut self, mut session: Session<'_>) -> Result<Option<()>> {
        loop {
            writeln!(self.output, "Welcome {}\n", session.customer().first_name)?;
            let Some(choice) = self.select(&[
                "Create checking or saving account",
                "Display an account",
                "Withdraw from account",
                "Deposit to account",
                "Logout",
            ])?
            else {
                return Ok(None);
            };

            let flow = match choice {
                1 => self.create_account(&mut session)?,
                2 => self.display_account(&session)?,
                3 => self.withdraw(&mut session)?,
                4 => self.deposit(&mut session)?,
                _ => {
                    session.logout();
                    return Ok(Some(()));
                }
            };
            if flow.is_none() {
                return Ok(None);
            }
        }
    }

    fn create_account(&mut self, session: &mut Session<'_>) -> Result<Option<()>> {
        let Some(pick) = self.pick_account("Create")? else {
            return Ok(None);
        };
        if let Pick::Account(kind) = pick {
            match session.create_account(kind) {
                Ok(_) => writeln!(self.output, "{} account created\n", kind)?,
                Err(e) => writeln!(self.output, "{}\n", e)?,
            }
        }
        Ok(Some(()))
    }

    fn display_account(&mut self, session: &Session<'_>) -> Result<Option<()>> {
        let Some(pick) = self.pick_account("Display")? else {
            return Ok(None);
        };
        if let Pick::Account(kind) = pick {
            match session.account(kind) {
                Some(account) => self.print_account(session.customer(), account)?,
                None => writeln!(self.output, "{}\n", BankError::NoAccount(kind))?,
            }
        }
        Ok(Some(()))
    }

    fn withdraw(&mut self, session: &mut Session<'_>) -> Result<Option<()>> {
        let Some(pick) = self.pick_account("Withdraw from")? else {
            return Ok(None);
        };
        let Pick::Account(kind) = pick else {
            return Ok(Some(()));
        };
        let Some(amount) = self.prompt_amount("Enter withdrawal amount: ")? else {
            return Ok(None);
        };

        match session.withdraw(kind, amount) {
            Ok(receipt) => {
                writeln!(self.output, "Successful withdrawal of {}", receipt.amount)?;
                if receipt.fee_charged() {
                    writeln!(self.output, "Service fee of ${} charged", receipt.fee)?;
                }
                writeln!(self.output, "New balance:  {}\n", receipt.balance)?;
            }
            Err(e) => writeln!(self.output, "{}\n", e)?,
        }
        Ok(Some(()))
    }

    fn deposit(&mut self, session: &mut Session<'_>) -> Result<Option<()>> {
        let Some(pick) = self.pick_account("Deposit into")? else {
            return Ok(None);
        };
        let Pick::Account(kind) = pick else {
            return Ok(Some(()));
        };
        let Some(amount) = self.prompt_amount("Enter deposit amount: ")? else {
            return Ok(None);
        };

        match session.deposit(kind, amount) {
            Ok(balance) => {
                writeln!(self.output, "Successful deposit of {}", amount)?;
                writeln!(self.output, "New balance:  {}\n", balance)?;
            }
            Err(e) => writeln!(self.output, "{}\n", e)?,
        }
        Ok(Some(()))
    }

    /// Collects a profile and password, then registers it.
    fn sign_up(&mut self) -> Result<Option<()>> {
        let mut profile = loop {
            let Some(profile) = self.prompt_profile()? else {
                return Ok(None);
            };
            let fields = profile.profile_fields();
            if fields.iter().any(|f| f.is_empty()) {
                writeln!(self.output, "{}\n", BankError::EmptyField)?;
            } else if fields.iter().any(|f| f.contains(char::from(DELIMITER))) {
                writeln!(self.output, "{}\n", BankError::InvalidInput)?;
            } else {
                break profile;
            }
        };

        let confirmation = loop {
            writeln!(
                self.output,
                "Create password\n\
                 Minimum of {} characters\n\
                 At least one uppercase letter\n\
                 At least one lowercase letter\n\
                 At least one number\n\
                 At least one special character\n",
                password::MIN_LENGTH
            )?;
            let Some(password) = self.prompt("Enter password: ")? else {
                return Ok(None);
            };
            let Some(confirmation) = self.prompt("Re-enter password: ")? else {
                return Ok(None);
            };

            let failed = password::check(&password, &confirmation);
            if failed.is_empty() {
                profile.password = password;
                break confirmation;
            }
            writeln!(self.output)?;
            for rule in failed {
                writeln!(self.output, "{}", rule)?;
            }
            writeln!(self.output)?;
        };

        match session::sign_up(self.bank, profile, &confirmation) {
            Ok(_) => writeln!(self.output, "User profile created\n")?,
            Err(e) => writeln!(self.output, "{}\n", e)?,
        }
        Ok(Some(()))
    }

    fn prompt_profile(&mut self) -> Result<Option<Customer>> {
        let labels = [
            "Enter first name: ",
            "Enter last name: ",
            "Enter address: ",
            "Enter phone number: ",
            "Enter email: ",
            "Enter username: ",
        ];
        let mut answers: [String; 6] = Default::default();
        for (label, slot) in labels.iter().zip(answers.iter_mut()) {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            *slot = answer;
        }

        let [first_name, last_name, address, phone_num, email, username] = answers;
        Ok(Some(Customer {
            username,
            first_name,
            last_name,
            address,
            phone_num,
            email,
            password: String::new(),
        }))
    }

    fn pick_account(&mut self, verb: &str) -> Result<Option<Pick>> {
        let checking = format!("{} checking account", verb);
        let saving = format!("{} saving account", verb);
        let Some(choice) = self.select(&[checking.as_str(), saving.as_str(), "Cancel"])? else {
            return Ok(None);
        };
        Ok(Some(match choice {
            1 => Pick::Account(AccountKind::Checking),
            2 => Pick::Account(AccountKind::Savings),
            _ => Pick::Cancel,
        }))
    }

    fn print_account(&mut self, customer: &Customer, account: &Account) -> Result<()> {
        let mut rows = vec![
            ("First name:", customer.first_name.clone()),
            ("Last name:", customer.last_name.clone()),
            ("Address:", customer.address.clone()),
            ("Phone number:", customer.phone_num.clone()),
            ("Email:", customer.email.clone()),
            ("Username:", customer.username.clone()),
            ("Balance:", account.balance.to_string()),
            ("ID:", account.id.to_string()),
            ("Number of deposits:", account.deposit_count.to_string()),
            ("Number of withdrawals:", account.withdrawal_count.to_string()),
        ];
        if let Some(rate) = account.interest_rate() {
            rows.push(("Interest rate:", rate.to_string()));
        }
        if let Some(limit) = account.overdraft_limit() {
            rows.push(("Overdraft limit:", limit.to_string()));
        }

        for (label, value) in rows {
            writeln!(self.output, "{:<width$}{}", label, value, width = LABEL_WIDTH)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// Shows numbered options until a valid number is entered.
    fn select(&mut self, options: &[&str]) -> Result<Option<usize>> {
        loop {
            for (idx, option) in options.iter().enumerate() {
                writeln!(self.output, "[{}] {}", idx + 1, option)?;
            }
            writeln!(self.output)?;
            let Some(answer) = self.prompt("Select: ")? else {
                return Ok(None);
            };
            match answer.trim().parse::<usize>() {
                Ok(choice) if (1..=options.len()).contains(&choice) => return Ok(Some(choice)),
                _ => writeln!(self.output)?,
            }
        }
    }

    /// Asks until the answer parses as a number.
    fn prompt_amount(&mut self, label: &str) -> Result<Option<Amount>> {
        loop {
            let Some(answer) = self.prompt(label)? else {
                return Ok(None);
            };
            if let Ok(amount) = Amount::from_str(&answer) {
                return Ok(Some(amount));
            }
        }
    }

    /// Writes `label` and reads one line without its terminator.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::fs;

    fn run_script(bank: &Bank, script: &str) -> String {
        let mut output = Vec::new();
        Console::new(bank, script.as_bytes(), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    const SIGN_UP: &str = "2\nGrace\nHopper\n1 Navy Yard\n555-0142\ngrace@example.com\ngrace\n\
                           Cobol#1959\nCobol#1959\n";

    #[test]
    fn test_exit_and_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let bank = Bank::open(&StoreConfig::in_dir(dir.path()));

        assert!(run_script(&bank, "3\n").contains("[3] Exit Program"));
        assert!(run_script(&bank, "").contains("Select: "));
        assert!(run_script(&bank, "abc\n9\n").contains("Welcome to the Project Bank"));
    }

    #[test]
    fn test_sign_up_retries_blank_fields_and_weak_passwords() {
        let dir = tempfile::tempdir().unwrap();
        let bank = Bank::open(&StoreConfig::in_dir(dir.path()));
        let script = "2\nGrace\n\n1 Navy Yard\n555-0142\ngrace@example.com\ngrace\n\
                      Grace\nHopper\n1 Navy Yard\n555-0142\ngrace@example.com\ngrace\n\
                      cobol\ncobol\nCobol#1959\nCobol#1959\n3\n";

        let output = run_script(&bank, script);
        assert!(output.contains("Fields cannot be blank"));
        assert!(output.contains("Password needs 8 characters."));
        assert!(output.contains("User profile created"));
        assert!(bank.customer_exists("grace").unwrap());
    }

    #[test]
    fn test_full_session() {
        let dir = tempfile::tempdir().unwrap();
        let bank = Bank::open(&StoreConfig::in_dir(dir.path()));
        let script = format!(
            "{}1\ngrace\nCobol#1959\n1\n1\n1\n1\n4\n1\n10\n3\n1\n20\n2\n1\n3\n1\n0\n5\n3\n",
            SIGN_UP
        );

        let output = run_script(&bank, &script);
        assert!(output.contains("Successfully logged in"));
        assert!(output.contains("Checking account created"));
        assert!(output.contains("Checking account already created"));
        assert!(output.contains("Successful deposit of 10"));
        assert!(output.contains("Service fee of $5 charged"));
        assert!(output.contains("New balance:  -15"));
        assert!(output.contains("Overdraft limit:              25"));
        assert!(output.contains("Amount must be greater than $0"));

        let contents = fs::read_to_string(bank.accounts().path()).unwrap();
        assert!(contents.starts_with("Checking:grace:-15:25:"));
        assert!(contents.ends_with(":1:1:\n"));
    }

    #[test]
    fn test_missing_account_and_failed_login() {
        let dir = tempfile::tempdir().unwrap();
        let bank = Bank::open(&StoreConfig::in_dir(dir.path()));
        let script = format!(
            "{}1\ngrace\nwrong\n1\ngrace\nCobol#1959\n2\n2\n4\n2\n5\n5\n3\n",
            SIGN_UP
        );

        let output = run_script(&bank, &script);
        assert!(output.contains("Login failed"));
        assert!(output.contains("No saving account found"));
    }

    #[test]
    fn test_deposit_past_range_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let bank = Bank::open(&StoreConfig::in_dir(dir.path()));
        let huge = "79228162514264337593543950335";
        let script = format!(
            "{}1\ngrace\nCobol#1959\n1\n1\n4\n1\n{huge}\n4\n1\n{huge}\n5\n3\n",
            SIGN_UP
        );

        let output = run_script(&bank, &script);
        assert!(output.contains(&format!("New balance:  {}", huge)));
        assert!(output.contains("Balance out of range"));

        let contents = fs::read_to_string(bank.accounts().path()).unwrap();
        assert!(contents.starts_with(&format!("Checking:grace:{}:25:", huge)));
        assert!(contents.ends_with(":1:0:\n"));
    }

    #[test]
    fn test_sign_up_rejects_delimiter_in_fields() {
        let dir = tempfile::tempdir().unwrap();
        let bank = Bank::open(&StoreConfig::in_dir(dir.path()));
        let script = "2\nGrace\nHopper\nSuite 4:B\n555-0142\ngrace@example.com\ngrace\n\
                      Grace\nHopper\n1 Navy Yard\n555-0142\ngrace@example.com\ngrace\n\
                      Cobol#1959\nCobol#1959\n3\n";

        let output = run_script(&bank, script);
        assert!(output.contains("Fields cannot contain ':'"));
        assert!(output.contains("User profile created"));

        let contents = fs::read_to_string(bank.customers().path()).unwrap();
        assert!(contents.contains(":1 Navy Yard:"));
        assert!(!contents.contains("Suite 4"));
    }
}
