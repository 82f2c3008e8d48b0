//! Password complexity rules for new profiles.

use std::fmt;

/// Minimum password length in characters.
pub const MIN_LENGTH: usize = 8;

/// A rule a new password failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Mismatch,
    TooShort,
    NoUppercase,
    NoLowercase,
    NoDigit,
    NoSpecial,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            PasswordRule::Mismatch => "Passwords do not match.",
            PasswordRule::TooShort => "Password needs 8 characters.",
            PasswordRule::NoUppercase => "Password needs an uppercase character.",
            PasswordRule::NoLowercase => "Password needs a lowercase character.",
            PasswordRule::NoDigit => "Password needs a number.",
            PasswordRule::NoSpecial => "Password needs a special character.",
        };
        f.write_str(message)
    }
}

/// Lists every rule `password` breaks. An empty list means it is accepted.
///
/// Characters that are not ASCII letters or digits count as special.
pub fn check(password: &str, confirmation: &str) -> Vec<PasswordRule> {
    let mut failed = Vec::new();

    if password != confirmation {
        failed.push(PasswordRule::Mismatch);
    }
    if password.chars().count() < MIN_LENGTH {
        failed.push(PasswordRule::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        failed.push(PasswordRule::NoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        failed.push(PasswordRule::NoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        failed.push(PasswordRule::NoDigit);
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        failed.push(PasswordRule::NoSpecial);
    }

    failed
}
