//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Cart, checkout and configuration errors        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  apps/checkout errors                                                  │
//! │  └── ConfigError      - Environment / config file failures             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConfigError → stderr              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax resolver itself has no error type: `rate`, `currency` and
//! `compute_total` are defined for every region string.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Resolver configuration could not be parsed or failed validation.
    ///
    /// ## When This Occurs
    /// - Malformed JSON in a tax table file
    /// - A currency code that is not three upper-case letters
    /// - A tax rate above 100%
    #[error("Invalid resolver configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Cart line cannot be found.
    #[error("Item not in cart: {0}")]
    ItemNotFound(String),

    /// Cart has exceeded maximum allowed items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A payment was requested for a cart with no items.
    #[error("Cannot build a payment request for an empty cart")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (non-numeric amount, bad currency code, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
