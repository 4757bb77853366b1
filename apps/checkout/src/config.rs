//! Checkout configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable               | Default    | Meaning                                  |
//! |------------------------|------------|------------------------------------------|
//! | `STOREFRONT_REGION`    | `US`       | Region used when none is given           |
//! | `STOREFRONT_TAX_TABLE` | (built-in) | Path to a resolver configuration JSON    |
//! | `STOREFRONT_LOG_JSON`  | `false`    | Emit logs as JSON lines                  |

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use storefront_core::{CoreError, TaxResolver};
use tracing::info;

/// Checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Region used when the caller does not pick one
    pub default_region: String,

    /// Resolver configuration file; `None` uses the built-in tables
    pub tax_table_path: Option<PathBuf>,

    /// JSON log output instead of human-readable
    pub log_json: bool,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            default_region: "US".to_string(),
            tax_table_path: None,
            log_json: false,
        }
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = CheckoutConfig::default();

        let log_json = match var("STOREFRONT_LOG_JSON") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("STOREFRONT_LOG_JSON".to_string()))?,
            None => defaults.log_json,
        };

        Ok(CheckoutConfig {
            default_region: var("STOREFRONT_REGION").unwrap_or(defaults.default_region),
            tax_table_path: var("STOREFRONT_TAX_TABLE").map(PathBuf::from),
            log_json,
        })
    }

    /// Builds the resolver this configuration points at.
    pub fn resolver(&self) -> Result<TaxResolver, ConfigError> {
        let Some(path) = &self.tax_table_path else {
            return Ok(TaxResolver::builtin());
        };

        let json = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let resolver = TaxResolver::from_json(&json)?;

        info!(
            path = %path.display(),
            tax_regions = resolver.taxes().len(),
            currency_regions = resolver.currencies().len(),
            "Loaded tax table"
        );
        Ok(resolver)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Cannot read tax table {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Resolver(#[from] CoreError),
}
