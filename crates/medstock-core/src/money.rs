//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing operator-entered prices as floats:                             │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise / cents)                      │
//! │    Every price is rounded ONCE, at entry, to 2 decimal places.          │
//! │    Line totals and the cart total are then exact integer sums.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Prices typed with more than two decimals are rounded half-to-even
//! (Bankers Rounding) when parsed. Nothing downstream rounds again.
//!
//! ## Usage
//! ```rust
//! use medstock_core::money::Money;
//!
//! let price: Money = "12.50".parse().unwrap();
//! assert_eq!(price.cents(), 1250);
//!
//! let line_total = price.multiply_quantity(2);
//! assert_eq!(line_total.to_string(), "25.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Minor units per major unit (2 decimal places).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: parsing accepts a sign so a negative entry can be
///   reported as a validation error instead of a parse error
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as the integer** minor-unit value
///
/// ## Where Money is Used
/// ```text
/// Operator types "12.5" ──► Money(1250) ──► CartLine.unit_price
///                                                │
///                          CartLine.line_total ◄─┘ (× quantity)
///                                  │
///                                  ▼
///                          Cart::compute_total ──► "Total ₹25.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use medstock_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ## Example
    /// ```rust
    /// use medstock_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(12).cents(), 1200);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use medstock_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    ///
    /// Saturates at the i64 bounds; use [`Money::checked_mul_quantity`] where
    /// overflow must be refused.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies by a quantity, `None` on overflow.
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns the value in major units as a float.
    ///
    /// ## Note
    /// For the wire only: the pharmacy API expects `price` as a JSON number.
    /// Never feed the result back into arithmetic.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses an operator-entered decimal price.
///
/// Accepts `"12"`, `"12.5"`, `"12.50"`, `".5"` and an optional sign. More
/// than two decimals are rounded half-to-even.
///
/// ## Example
/// ```rust
/// use medstock_core::money::Money;
///
/// assert_eq!("12.345".parse::<Money>().unwrap().cents(), 1234);
/// assert_eq!("12.355".parse::<Money>().unwrap().cents(), 1236);
/// assert!("twelve".parse::<Money>().is_err());
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (negative, unsigned) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let (major_str, fraction) = match unsigned.split_once('.') {
            Some((major, fraction)) => (major, fraction),
            None => (unsigned, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (major_str.is_empty() && fraction.is_empty())
            || !all_digits(major_str)
            || !all_digits(fraction)
        {
            return Err(invalid_price("expected a decimal number such as 12.50"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str
                .parse()
                .map_err(|_| invalid_price("amount is too large"))?
        };

        let digits = fraction.as_bytes();
        let digit_at = |i: usize| digits.get(i).map_or(0, |d| i64::from(d - b'0'));
        let mut minor = digit_at(0) * 10 + digit_at(1);

        // Round half to even on whatever follows the second decimal.
        if digits.len() > 2 {
            let rest = &digits[2..];
            let round_up = match rest[0] {
                b'6'..=b'9' => true,
                b'5' => rest[1..].iter().any(|&d| d != b'0') || minor % 2 == 1,
                _ => false,
            };
            if round_up {
                minor += 1;
            }
        }

        let cents = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid_price("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

fn invalid_price(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Operators saturate instead of wrapping. The cart refuses any change whose
// total would not fit, so saturation is never reached from a cart.

/// Plain decimal rendering (`"24.00"`, `"-5.50"`).
///
/// ## Note
/// Currency symbols and localisation belong to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_major(24)), "24.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);

        assert_eq!(huge.multiply_quantity(2), Money::from_cents(i64::MAX));
        assert_eq!(huge + huge, Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(i64::MIN) * 2, Money::from_cents(i64::MIN));

        let total: Money = vec![huge, huge, huge].into_iter().sum();
        assert_eq!(total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_checked_arithmetic() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);

        assert_eq!(huge.checked_mul_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(
            Money::from_cents(299).checked_mul_quantity(3),
            Some(Money::from_cents(897))
        );
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
    }

    #[test]
    fn test_parse_plain_amounts() {
        assert_eq!("12".parse::<Money>().unwrap(), Money::from_major(12));
        assert_eq!("12.5".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!("12.50".parse::<Money>().unwrap().cents(), 1250);
        assert_eq!(".5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!("  7.05 ".parse::<Money>().unwrap().cents(), 705);
        assert_eq!("-5.50".parse::<Money>().unwrap().cents(), -550);
    }

    #[test]
    fn test_parse_rounds_half_to_even() {
        assert_eq!("12.345".parse::<Money>().unwrap().cents(), 1234);
        assert_eq!("12.355".parse::<Money>().unwrap().cents(), 1236);
        assert_eq!("12.3451".parse::<Money>().unwrap().cents(), 1235);
        assert_eq!("12.344".parse::<Money>().unwrap().cents(), 1234);
        assert_eq!("12.346".parse::<Money>().unwrap().cents(), 1235);
        assert_eq!("0.995".parse::<Money>().unwrap().cents(), 100);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "".parse::<Money>(),
            Err(ValidationError::Required { .. })
        ));
        assert!("abc".parse::<Money>().is_err());
        assert!("1.2.3".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1e5".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    #[test]
    fn test_to_major_f64() {
        assert!((Money::from_cents(1250).to_major_f64() - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_as_minor_units() {
        let json = serde_json::to_string(&Money::from_cents(1250)).unwrap();
        assert_eq!(json, "1250");
    }
}
