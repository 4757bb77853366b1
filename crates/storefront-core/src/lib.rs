//! # storefront-core: Pure Checkout Logic for the Storefront
//!
//! Tax and currency resolution, cart math and payment payload construction,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Caller (checkout page, apps/checkout CLI)            │   │
//! │  │      picks region ──► builds cart ──► submits payment           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │    tax    │  │   cart    │  │ checkout  │  │   │
//! │  │   │   Money   │  │ Resolver  │  │   Cart    │  │  Quote    │  │   │
//! │  │   │  TaxRate  │  │  Tables   │  │ CartItem  │  │  Payment  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILESYSTEM • PURE FUNCTIONS         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - TaxRate, RegionCode, CurrencyCode, OrderTotals
//! - [`tax`] - TaxResolver and its lookup tables
//! - [`cart`] - Shopping cart
//! - [`checkout`] - Quotes and payment payloads
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Total lookups**: every region string resolves to a rate and a
//!    currency; a missing entry means 0% / USD, never an error
//! 2. **Integer Money**: amounts are cents (i64), so there is no NaN
//! 3. **Immutable tables**: built once, shared freely across threads
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Money, TaxResolver};
//!
//! let resolver = TaxResolver::global();
//! let subtotal: Money = "100.00".parse().unwrap();
//!
//! let totals = resolver.compute_total(subtotal, "CA");
//! assert_eq!(totals.total.to_decimal_string(), "113.00");
//! assert_eq!(resolver.currency("CA").as_str(), "CAD");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use checkout::{CheckoutProcessor, CheckoutQuote, PaymentRequest};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use tax::{CurrencyTable, ResolverConfig, TaxResolver, TaxTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency for every region without a configured one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest absolute amount, in cents, accepted from text ($10 trillion).
///
/// Leaves room for a 100% tax on top without leaving the `i64` range.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000_000;

/// Largest catalogue unit price, in cents ($1 billion).
///
/// A full cart at this price (`MAX_CART_ITEMS` lines of `MAX_ITEM_QUANTITY`)
/// still fits in an `i64`.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000_000;
