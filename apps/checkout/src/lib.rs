//! # Storefront Checkout
//!
//! Command-line orchestration over `storefront-core`: loads configuration,
//! installs logging, quotes carts and prints payment payloads.
//!
//! ## Modules
//!
//! - [`config`] - Environment-based configuration
//! - [`quote`] - Argument parsing and the quote command
//! - [`telemetry`] - Tracing subscriber setup

pub mod config;
pub mod quote;
pub mod telemetry;

pub use config::{CheckoutConfig, ConfigError};
pub use quote::{Command, QuoteArgs, UsageError, USAGE};
