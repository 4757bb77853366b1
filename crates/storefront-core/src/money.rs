//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floats a missing tax rate turns into NaN:                        │
//! │    100 * undefined = NaN,  100 + NaN = NaN,  NaN.toFixed(2) = "NaN"    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    There is no NaN in i64. Decimal text from the outside world is      │
//! │    parsed once at the boundary, and non-numeric text is rejected       │
//! │    there with a ValidationError instead of leaking into arithmetic.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price: Money = "29.99".parse().unwrap();
//! assert_eq!(price.cents(), 2999);
//!
//! let total = price + Money::from_cents(1999);
//! assert_eq!(total.to_decimal_string(), "49.98");
//!
//! assert!("NaN".parse::<Money>().is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;
use crate::MAX_AMOUNT_CENTS;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative subtotals are accepted and carried through
///   tax computation unchanged in sign
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// CartItem.unit_price ──► CartItem.line_total ──► Cart.subtotal
///                                                       │
///                                                       ▼
///                         TaxResolver::compute_total(subtotal, region)
///                                                       │
///                                                       ▼
///                       OrderTotals { tax, total } ──► PaymentRequest.amount "108.00"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(100).cents(), 10_000);
    /// assert_eq!(Money::from_major(-50).cents(), -5_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Parses a decimal amount such as `"100"`, `"29.99"` or `"-50.5"`.
    ///
    /// Accepts an optional sign, at least one integer digit and at most two
    /// fractional digits, up to [`MAX_AMOUNT_CENTS`] in magnitude. Anything
    /// else, including `"NaN"` and `"inf"`, is a
    /// [`ValidationError::InvalidFormat`].
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "amount".to_string(),
            });
        }

        let (negative, unsigned) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let (major_str, minor_str) = match unsigned.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (unsigned, None),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

        if !all_digits(major_str) || minor_str.is_some_and(|minor| !all_digits(minor)) {
            return Err(invalid_amount(format!("'{}' is not a finite decimal amount", s)));
        }

        let minor = match minor_str {
            None => 0,
            Some(minor) if minor.len() > 2 => {
                return Err(invalid_amount(format!(
                    "'{}' has more than 2 decimal places",
                    s
                )));
            }
            // "5" after the point means 50 cents
            Some(minor) if minor.len() == 1 => parse_digits(minor)? * 10,
            Some(minor) => parse_digits(minor)?,
        };

        let cents = parse_digits(major_str)?
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .filter(|c| *c <= MAX_AMOUNT_CENTS)
            .ok_or_else(|| invalid_amount(format!("'{}' is too large", s)))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion, truncated toward zero.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).dollars(), 10);
    /// assert_eq!(Money::from_cents(-550).dollars(), -5);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Calculates `self × rate`, rounded to the nearest cent.
    ///
    /// ## Rounding
    /// Half-cent results round away from zero, so the tax on a negative
    /// amount is exactly the negation of the tax on the positive amount.
    /// A plain `(amount * bps + 5000) / 10000` would truncate negatives
    /// toward zero and turn -$50.00 @ 8% into -$3.99.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::TaxRate;
    ///
    /// let rate = TaxRate::from_bps(825); // 8.25%
    /// assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 83);
    /// assert_eq!(Money::from_cents(-1000).calculate_tax(rate).cents(), -83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so amount * bps cannot overflow
        let scaled = self.0 as i128 * rate.bps() as i128;
        let tax_cents = div_round_half_away(scaled, BPS_SCALE);
        Money(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Addition clamped to the `i64` bounds instead of overflowing.
    ///
    /// Exact for any two amounts within [`MAX_AMOUNT_CENTS`].
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Renders the amount with exactly two decimals and no currency symbol.
    ///
    /// This is the wire format of `PaymentRequest::amount`.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(10_800).to_decimal_string(), "108.00");
    /// assert_eq!(Money::from_cents(-5_400).to_decimal_string(), "-54.00");
    /// ```
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

fn invalid_amount(reason: String) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason,
    }
}

fn parse_digits(digits: &str) -> Result<i64, ValidationError> {
    digits
        .parse::<i64>()
        .map_err(|_| invalid_amount(format!("'{}' is too large", digits)))
}

/// Integer division rounding half away from zero. `denom` must be positive.
fn div_round_half_away(numer: i128, denom: i128) -> i128 {
    let quotient = numer / denom;
    let remainder = numer % denom;
    if remainder.abs() * 2 >= denom {
        quotient + numer.signum()
    } else {
        quotient
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$10.99` / `-$5.50`.
///
/// Debug/log output only; the symbol is always `$` regardless of the
/// resolved currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-5)), "-$0.05");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(4998).to_decimal_string(), "49.98");
        assert_eq!(Money::zero().to_decimal_string(), "0.00");
        assert_eq!(Money::from_cents(-1).to_decimal_string(), "-0.01");
        assert_eq!(Money::from_cents(i64::MIN).to_decimal_string(), "-92233720368547758.08");
    }

    #[test]
    fn test_parse_valid_amounts() {
        assert_eq!(Money::parse("100").unwrap().cents(), 10_000);
        assert_eq!(Money::parse("29.99").unwrap().cents(), 2999);
        assert_eq!(Money::parse("19.9").unwrap().cents(), 1990);
        assert_eq!(Money::parse("-50").unwrap().cents(), -5_000);
        assert_eq!(Money::parse("+0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse("  0  ").unwrap().cents(), 0);
    }

    #[test]
    fn test_parse_rejects_non_finite_and_garbage() {
        for bad in ["NaN", "nan", "inf", "-Infinity", "abc", "1e3", "10.", ".5", "1.2.3", "-", "--5"] {
            let err = Money::parse(bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { .. }),
                "expected InvalidFormat for {:?}, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_and_precision() {
        assert!(matches!(
            Money::parse("   ").unwrap_err(),
            ValidationError::Required { .. }
        ));
        assert!(Money::parse("1.005").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_major(100);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(800)).cents(), 800);
        assert_eq!(amount.calculate_tax(TaxRate::from_bps(1300)).cents(), 1300);
        assert_eq!(amount.calculate_tax(TaxRate::zero()).cents(), 0);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // $10.00 at 8.25% = $0.825 → $0.83
        let rate = TaxRate::from_bps(825);
        assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 83);
        // $0.10 at 8.25% = $0.00825 → $0.01
        assert_eq!(Money::from_cents(10).calculate_tax(rate).cents(), 1);
        // $0.06 at 8% = $0.0048 → $0.00
        assert_eq!(Money::from_cents(6).calculate_tax(TaxRate::from_bps(800)).cents(), 0);
    }

    #[test]
    fn test_tax_on_negative_amount_mirrors_positive() {
        let rate = TaxRate::from_bps(800);
        assert_eq!(Money::from_major(-50).calculate_tax(rate).cents(), -400);

        let rate = TaxRate::from_bps(825);
        for cents in [1, 10, 999, 1000, 4998, 123_457] {
            let pos = Money::from_cents(cents).calculate_tax(rate);
            let neg = Money::from_cents(-cents).calculate_tax(rate);
            assert_eq!(neg, -pos, "asymmetric rounding at {} cents", cents);
        }
    }

    #[test]
    fn test_tax_does_not_overflow_on_large_amounts() {
        let tax = Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(10_000));
        assert_eq!(tax.cents(), i64::MAX);
    }

    #[test]
    fn test_parse_enforces_max_amount() {
        assert_eq!(Money::parse("10000000000000").unwrap().cents(), MAX_AMOUNT_CENTS);
        assert_eq!(Money::parse("-10000000000000.00").unwrap().cents(), -MAX_AMOUNT_CENTS);
        assert!(Money::parse("10000000000000.01").is_err());
        assert!(Money::parse("92233720368547758.07").is_err());
        assert!(Money::parse("-92233720368547758.08").is_err());
    }

    #[test]
    fn test_saturating_arithmetic() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max.saturating_add(Money::from_cents(1)), max);
        assert_eq!(min.saturating_add(Money::from_cents(-1)), min);
        assert_eq!(Money::from_cents(5).saturating_add(Money::from_cents(-7)).cents(), -2);
        assert_eq!(max.multiply_quantity(2), max);
        assert_eq!(max.multiply_quantity(-2), min);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    }
}
