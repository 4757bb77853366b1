//! # Quote Command
//!
//! Argument parsing and execution for `checkout-quote`.
//!
//! ```text
//! checkout-quote [--region <CODE>] <ITEM>...
//! checkout-quote [--region <CODE>] --subtotal <AMOUNT>
//!
//!   ITEM      PRICE or NAME=PRICE, e.g. 29.99 or "Premium Support=19.99"
//!   AMOUNT    any decimal, negative allowed
//! ```

use serde::Serialize;
use storefront_core::{
    Cart, CheckoutProcessor, CheckoutQuote, CoreError, CurrencyCode, Money, OrderTotals,
    PaymentRequest, TaxResolver, ValidationError,
};
use tracing::debug;

/// Help text printed for `--help` and on usage errors.
pub const USAGE: &str = "\
Usage: checkout-quote [--region <CODE>] <ITEM>...
       checkout-quote [--region <CODE>] --subtotal <AMOUNT>

Arguments:
  <ITEM>                 PRICE or NAME=PRICE (e.g. 29.99 or \"Premium Support=19.99\")

Options:
  -r, --region <CODE>    Region for tax and currency (default: $STOREFRONT_REGION or US)
  -s, --subtotal <AMT>   Quote a bare subtotal instead of a cart (negative allowed)
  -h, --help             Show this help message";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quote(QuoteArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteArgs {
    pub region: Option<String>,
    pub input: QuoteInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteInput {
    /// `(name, unit price)` lines, each with quantity 1 (repeats merge).
    Items(Vec<(String, Money)>),
    Subtotal(Money),
}

/// Errors from argument parsing or cart construction.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("unknown option {0}")]
    UnknownOption(String),

    #[error("no items given")]
    NoItems,

    #[error("--subtotal cannot be combined with items")]
    SubtotalWithItems,

    #[error("invalid amount '{input}': {source}")]
    InvalidAmount {
        input: String,
        #[source]
        source: ValidationError,
    },

    #[error(transparent)]
    Cart(#[from] CoreError),

    #[error("failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

impl Command {
    /// Parses arguments (without the program name).
    pub fn parse<I, S>(args: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut region = None;
        let mut subtotal = None;
        let mut items = Vec::new();

        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--region" | "-r" => {
                    region = Some(args.next().ok_or_else(|| UsageError::MissingValue(arg.clone()))?);
                }
                "--subtotal" | "-s" => {
                    let raw = args.next().ok_or_else(|| UsageError::MissingValue(arg.clone()))?;
                    subtotal = Some(parse_amount(&raw)?);
                }
                // "-5" is a (rejected later) price, not an option
                opt if opt.starts_with('-') && opt.parse::<Money>().is_err() => {
                    return Err(UsageError::UnknownOption(opt.to_string()));
                }
                _ => items.push(parse_item(&arg, items.len() + 1)?),
            }
        }

        let input = match (subtotal, items.is_empty()) {
            (Some(_), false) => return Err(UsageError::SubtotalWithItems),
            (Some(amount), true) => QuoteInput::Subtotal(amount),
            (None, true) => return Err(UsageError::NoItems),
            (None, false) => QuoteInput::Items(items),
        };

        Ok(Command::Quote(QuoteArgs { region, input }))
    }
}

fn parse_amount(raw: &str) -> Result<Money, UsageError> {
    raw.parse::<Money>().map_err(|source| UsageError::InvalidAmount {
        input: raw.to_string(),
        source,
    })
}

fn parse_item(arg: &str, position: usize) -> Result<(String, Money), UsageError> {
    match arg.rsplit_once('=') {
        Some((name, price)) => Ok((name.to_string(), parse_amount(price)?)),
        None => Ok((format!("Item {}", position), parse_amount(arg)?)),
    }
}

/// Output of a cart quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuoteOutput {
    pub quote: CheckoutQuote,
    pub payment: PaymentRequest,
}

/// Output of a bare subtotal quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtotalQuoteOutput {
    pub region: String,
    pub currency: CurrencyCode,
    pub totals: OrderTotals,
    /// `totals.total` with two decimals
    pub amount: String,
}

/// Runs a quote and returns the pretty-printed JSON to write to stdout.
pub fn run(args: &QuoteArgs, default_region: &str, resolver: &TaxResolver) -> Result<String, UsageError> {
    let region = args.region.as_deref().unwrap_or(default_region);
    debug!(region, "Quoting");

    let json = match &args.input {
        QuoteInput::Subtotal(subtotal) => {
            let totals = resolver.compute_total(*subtotal, region);
            to_json(&SubtotalQuoteOutput {
                region: region.to_string(),
                currency: resolver.currency(region).clone(),
                totals,
                amount: totals.total.to_decimal_string(),
            })?
        }
        QuoteInput::Items(items) => {
            let mut cart = Cart::new();
            for (name, price) in items {
                cart.add_item(name, *price, 1)?;
            }

            let processor = CheckoutProcessor::new(resolver);
            let quote = processor.quote(&cart, region);
            let payment = processor.payment_request(&cart, &quote)?;
            to_json(&CartQuoteOutput { quote, payment })?
        }
    };

    Ok(json)
}

fn to_json<T: Serialize>(value: &T) -> Result<String, UsageError> {
    Ok(serde_json::to_string_pretty(value)?)
}
