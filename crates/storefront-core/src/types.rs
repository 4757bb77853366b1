//! # Domain Types
//!
//! Core domain types used by the checkout.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   RegionCode    │   │  CurrencyCode   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  any string     │   │  "USD", "EUR"   │       │
//! │  │  800 = 8%       │   │  case-sensitive │   │  3 letters A-Z  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │  OrderTotals                            │                            │
//! │  │  subtotal + tax = total (always)        │                            │
//! │  └─────────────────────────────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::validate_currency_code;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 800 bps = 8% (US), 1300 bps = 13% (CA).
/// Unsigned, so a rate can never be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate, the value of every unmapped region.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Sums component rates into one effective rate.
    ///
    /// ```rust
    /// use storefront_core::types::TaxRate;
    ///
    /// // 20% VAT + 3% digital services tax
    /// let eu = TaxRate::combined([TaxRate::from_bps(2000), TaxRate::from_bps(300)]);
    /// assert_eq!(eu.bps(), 2300);
    /// ```
    pub fn combined<I>(components: I) -> Self
    where
        I: IntoIterator<Item = TaxRate>,
    {
        components.into_iter().fold(TaxRate::zero(), Add::add)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl Add for TaxRate {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        TaxRate(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Region Code
// =============================================================================

/// A jurisdiction key for tax/currency lookup ("US", "CA", "DE", ...).
///
/// Opaque and case-sensitive. Any string is accepted, including the empty
/// string; unknown regions simply resolve to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn new(code: impl Into<String>) -> Self {
        RegionCode(code.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionCode {
    fn from(code: &str) -> Self {
        RegionCode(code.to_string())
    }
}

impl From<String> for RegionCode {
    fn from(code: String) -> Self {
        RegionCode(code)
    }
}

impl AsRef<str> for RegionCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Currency Code
// =============================================================================

/// A three-letter upper-case currency code ("USD", "CAD", "EUR").
///
/// Only constructed through [`CurrencyCode::new`] or deserialization, both of
/// which validate the format. No conversion between currencies is performed
/// anywhere in this crate; the code is a display label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validates and wraps a currency code.
    ///
    /// ```rust
    /// use storefront_core::types::CurrencyCode;
    ///
    /// assert_eq!(CurrencyCode::new("EUR").unwrap().as_str(), "EUR");
    /// assert!(CurrencyCode::new("eur").is_err());
    /// assert!(CurrencyCode::new("EURO").is_err());
    /// ```
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        validate_currency_code(&code)?;
        Ok(CurrencyCode(code))
    }

    /// The baseline currency for regions without a configured one.
    pub fn usd() -> Self {
        CurrencyCode::from_static(crate::DEFAULT_CURRENCY)
    }

    /// Wraps a compile-time constant code without the runtime check.
    pub(crate) fn from_static(code: &'static str) -> Self {
        debug_assert!(validate_currency_code(code).is_ok(), "bad builtin currency {}", code);
        CurrencyCode(code.to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::usd()
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        CurrencyCode::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Order Totals
// =============================================================================

/// Result of a tax computation for one checkout attempt.
///
/// ## Invariant
/// `total == subtotal + tax` for every subtotal within `MAX_AMOUNT_CENTS`.
/// Beyond that the total saturates at the `i64` bounds instead of
/// overflowing. Not persisted here; the caller owns formatting and
/// transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl OrderTotals {
    /// Builds totals from a subtotal and its tax, deriving the total.
    #[inline]
    pub fn new(subtotal: Money, tax: Money) -> Self {
        OrderTotals {
            subtotal,
            tax,
            total: subtotal.saturating_add(tax),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
