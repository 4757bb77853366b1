//! # Checkout
//!
//! Turns a cart and a region into a quote, and a quote into the payment
//! payload sent to the payments endpoint.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart ──► subtotal ──┐                                                  │
//! │                      ├──► TaxResolver::compute_total ──► CheckoutQuote  │
//! │  region ─────────────┘             │                                    │
//! │                                    └──► currency(region)                │
//! │                                                                         │
//! │  CheckoutQuote ──► PaymentRequest { amount: "108.00", currency, items } │
//! │                        │                                                │
//! │                        └── amount re-validated: never "NaN"             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Submitting the payload is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult};
use crate::tax::TaxResolver;
use crate::types::{CurrencyCode, OrderTotals, RegionCode};
use crate::validation::validate_amount_str;

/// Totals and currency for one cart in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub region: RegionCode,
    pub currency: CurrencyCode,
    pub totals: OrderTotals,
}

/// Payload for the payments endpoint.
///
/// ```json
/// {
///   "paymentId": "0b6d…",
///   "amount": "108.00",
///   "currency": "USD",
///   "items": [{ "name": "Test Item", "unitPrice": 10000, "quantity": 1 }],
///   "createdAt": "2025-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[ts(as = "String")]
    pub payment_id: Uuid,

    /// Total with exactly two decimals.
    pub amount: String,

    pub currency: CurrencyCode,

    pub items: Vec<CartItem>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Checkout orchestration over a borrowed resolver.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutProcessor<'a> {
    resolver: &'a TaxResolver,
}

impl<'a> CheckoutProcessor<'a> {
    pub fn new(resolver: &'a TaxResolver) -> Self {
        CheckoutProcessor { resolver }
    }

    pub fn resolver(&self) -> &'a TaxResolver {
        self.resolver
    }

    /// Quotes a cart for a region. Pure: the same cart and region always
    /// produce the same quote.
    ///
    /// ```rust
    /// use storefront_core::cart::Cart;
    /// use storefront_core::checkout::CheckoutProcessor;
    /// use storefront_core::money::Money;
    /// use storefront_core::tax::TaxResolver;
    ///
    /// let mut cart = Cart::new();
    /// cart.add_item("Test Item", Money::from_major(100), 1).unwrap();
    ///
    /// let quote = CheckoutProcessor::new(TaxResolver::global()).quote(&cart, "CA");
    /// assert_eq!(quote.totals.total, Money::from_major(113));
    /// assert_eq!(quote.currency.as_str(), "CAD");
    /// ```
    pub fn quote(&self, cart: &Cart, region: &str) -> CheckoutQuote {
        CheckoutQuote {
            region: RegionCode::from(region),
            currency: self.resolver.currency(region).clone(),
            totals: self.resolver.compute_total(cart.subtotal(), region),
        }
    }

    /// Quotes the cart and builds the payment payload for it.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` when there is nothing to pay for
    /// - `CoreError::Validation` if the formatted amount is not a valid
    ///   two-decimal number
    pub fn prepare_payment(&self, cart: &Cart, region: &str) -> CoreResult<PaymentRequest> {
        let quote = self.quote(cart, region);
        self.payment_request(cart, &quote)
    }

    /// Builds the payment payload for an existing quote of `cart`.
    pub fn payment_request(&self, cart: &Cart, quote: &CheckoutQuote) -> CoreResult<PaymentRequest> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let amount = quote.totals.total.to_decimal_string();
        validate_amount_str(&amount)?;

        let request = PaymentRequest {
            payment_id: Uuid::new_v4(),
            amount,
            currency: quote.currency.clone(),
            items: cart.items().to_vec(),
            created_at: Utc::now(),
        };

        info!(
            payment_id = %request.payment_id,
            region = %quote.region,
            amount = %request.amount,
            currency = %request.currency,
            items = request.items.len(),
            "Payment request prepared"
        );

        Ok(request)
    }
}
