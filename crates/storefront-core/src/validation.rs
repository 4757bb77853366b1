//! # Validation Module
//!
//! Input validation utilities for the checkout.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Points                                  │
//! │                                                                         │
//! │  Resolver configuration (JSON)                                         │
//! │  ├── region keys, currency codes, rate ranges                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Cart operations                                                       │
//! │  ├── item names, prices, quantities, cart size                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Payment payload                                                       │
//! │  └── amount string is a finite two-decimal number (never "NaN")        │
//! │                                                                         │
//! │  Tax lookups are NOT validated: any region string is accepted and      │
//! │  unknown regions fall back to defaults.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest region key accepted in a resolver configuration.
pub const MAX_REGION_CODE_LEN: usize = 16;

/// Rates above 100% are rejected.
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a region key from a resolver configuration file.
///
/// Lookups accept any string, but a configured key must be something a
/// lookup could actually hit: non-empty, at most 16 characters, and free of
/// whitespace (keys are matched exactly, so `"US "` would never match).
pub fn validate_region_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "region".to_string(),
        });
    }

    if code.chars().count() > MAX_REGION_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "region".to_string(),
            max: MAX_REGION_CODE_LEN,
        });
    }

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "region".to_string(),
            reason: format!("'{}' contains whitespace", code),
        });
    }

    Ok(())
}

/// Validates a currency code: exactly three upper-case ASCII letters.
///
/// ```rust
/// use storefront_core::validation::validate_currency_code;
///
/// assert!(validate_currency_code("CAD").is_ok());
/// assert!(validate_currency_code("cad").is_err());
/// assert!(validate_currency_code("").is_err());
/// ```
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: format!("'{}' must be three upper-case letters", code),
        });
    }

    Ok(())
}

/// Validates a cart item name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a payment amount as it appears on the wire (`"108.00"`).
///
/// ## Rules
/// - Optional leading `-`, at least one digit, a `.` and exactly two digits
/// - `"NaN"`, `"Infinity"`, `"null"` and friends are rejected
///
/// Returns the parsed amount.
///
/// ```rust
/// use storefront_core::validation::validate_amount_str;
///
/// assert_eq!(validate_amount_str("108.00").unwrap().cents(), 10_800);
/// assert!(validate_amount_str("NaN").is_err());
/// assert!(validate_amount_str("108").is_err());
/// ```
pub fn validate_amount_str(amount: &str) -> ValidationResult<Money> {
    let unsigned = amount.strip_prefix('-').unwrap_or(amount);
    let two_decimals = matches!(
        unsigned.split_once('.'),
        Some((major, minor)) if !major.is_empty() && minor.len() == 2
    );

    if !two_decimals {
        return Err(ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a two-decimal amount", amount),
        });
    }

    Money::parse(amount)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - At most MAX_UNIT_PRICE_CENTS ($1 billion)
///
/// Subtotals handed straight to the resolver may still be negative; this
/// only applies to catalogue prices entering a cart.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_UNIT_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: MAX_TAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
