//! # checkout-quote
//!
//! Quotes a cart for a region and prints the quote and payment payload.
//!
//! ## Usage
//! ```bash
//! # US customer, two items
//! cargo run -p storefront-checkout -- --region US "Todo App Pro License=29.99" "Premium Support=19.99"
//!
//! # German customer: no tax entry, finite total, EUR label
//! cargo run -p storefront-checkout -- --region DE 100
//!
//! # Bare subtotal (negative allowed)
//! cargo run -p storefront-checkout -- --region US --subtotal -50
//! ```

use std::env;
use std::process::ExitCode;

use storefront_checkout::quote::{self, Command};
use storefront_checkout::{telemetry, CheckoutConfig, USAGE};
use tracing::{error, info};

fn main() -> ExitCode {
    let command = match Command::parse(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            return ExitCode::from(2);
        }
    };

    let args = match command {
        Command::Help => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Command::Quote(args) => args,
    };

    let config = match CheckoutConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    telemetry::init(config.log_json);
    info!(
        default_region = %config.default_region,
        tax_table = ?config.tax_table_path,
        "Configuration loaded"
    );

    let resolver = match config.resolver() {
        Ok(resolver) => resolver,
        Err(e) => {
            error!(error = %e, "Failed to build tax resolver");
            return ExitCode::FAILURE;
        }
    };

    match quote::run(&args, &config.default_region, &resolver) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Quote failed");
            ExitCode::FAILURE
        }
    }
}
