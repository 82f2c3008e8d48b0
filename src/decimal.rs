//! Fixed-point decimal used for balances, rates and limits.
//!
//! Values carry at most 4 fractional digits and are rendered without
//! trailing zeros, so the record files hold `0`, `0.05`, `25` or `1234.5`
//! rather than padded text.

use rust_decimal::Decimal;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A decimal rounded to at most 4 fractional digits after every operation.
///
/// Arithmetic is checked: `None` means the result left the 96-bit range of
/// the underlying decimal.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use project_bank::Amount;
///
/// let amount = Amount::from_str("10.50").unwrap();
/// assert_eq!(amount.to_string(), "10.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Maximum number of fractional digits kept.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates an `Amount`, rounding to at most 4 fractional digits.
    pub fn new(value: Decimal) -> Self {
        Amount(value.round_dp(Self::SCALE).normalize())
    }

    /// Whole-number amount, e.g. a fee or a limit.
    pub fn from_int(value: i64) -> Self {
        Amount(Decimal::from(value))
    }

    /// Builds `mantissa * 10^-scale`, e.g. `from_parts(5, 2)` is `0.05`.
    pub fn from_parts(mantissa: i64, scale: u32) -> Self {
        Amount::new(Decimal::new(mantissa, scale))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount::new)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount::new)
    }

    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Amount::new)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = match Decimal::from_str(trimmed) {
            Ok(decimal) => decimal,
            // Default float formatting switches to exponent form for large values
            Err(e) if trimmed.contains(['e', 'E']) => {
                Decimal::from_scientific(trimmed).map_err(|_| e)?
            }
            Err(e) => return Err(e),
        };
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        write!(f, "{}", self.0.normalize())
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount::new(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_display_strips_trailing_zeros() {
        assert_eq!(amt("0").to_string(), "0");
        assert_eq!(amt("0.05").to_string(), "0.05");
        assert_eq!(amt("0.0500").to_string(), "0.05");
        assert_eq!(amt("25").to_string(), "25");
        assert_eq!(amt("1234.50").to_string(), "1234.5");
        assert_eq!(amt("-15.0").to_string(), "-15");
    }

    #[test]
    fn test_rounds_to_four_places() {
        assert_eq!(amt("1.23456").to_string(), "1.2346");
        let mul = |a: &str, b: &str| amt(a).checked_mul(amt(b)).unwrap().to_string();
        assert_eq!(mul("100.5", "1.05"), "105.525");
        assert_eq!(mul("0.3333", "0.3333"), "0.1111");
    }

    #[test]
    fn test_parses_scientific_notation() {
        assert_eq!(amt("1.5e+06").to_string(), "1500000");
        assert_eq!(amt("2E-2").to_string(), "0.02");
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
    }

    #[test]
    fn test_zero_is_never_negative() {
        let zero = amt("5").checked_sub(amt("5")).unwrap();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(!zero.is_positive());
        assert_eq!(zero.to_string(), "0");
        assert_eq!((-Amount::ZERO).to_string(), "0");
    }

    #[test]
    fn test_arithmetic_and_ordering() {
        let a = amt("10");
        let b = amt("20");
        let diff = a.checked_sub(b).unwrap();
        assert_eq!(diff.to_string(), "-10");
        assert!(diff < Amount::ZERO);
        assert!(diff.is_negative());
        assert_eq!(a.checked_add(b).unwrap(), amt("30"));
        assert_eq!(Amount::from_parts(5, 2), amt("0.05"));
        assert_eq!(Amount::from_int(25), amt("25.000"));
    }

    #[test]
    fn test_out_of_range_arithmetic_is_none() {
        let max = amt("79228162514264337593543950335");
        assert_eq!(max.checked_add(amt("1")), None);
        assert_eq!((-max).checked_sub(amt("1")), None);
        assert_eq!(max.checked_mul(amt("1.05")), None);
        assert_eq!(
            max.checked_sub(amt("1")).unwrap().to_string(),
            "79228162514264337593543950334"
        );
    }
}
