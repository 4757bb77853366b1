//! # Tax Resolution
//!
//! Resolves the tax rate and currency for a region and computes order totals.
//!
//! ## Lookup Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  region ──► TaxTable ──────── hit ──► configured rate                   │
//! │                 │                                                       │
//! │                 └─────────── miss ──► 0%   (never "undefined")          │
//! │                                                                         │
//! │  region ──► CurrencyTable ─── hit ──► configured code                   │
//! │                 │                                                       │
//! │                 └─────────── miss ──► baseline ("USD")                  │
//! │                                                                         │
//! │  The two tables have independent key sets: GB/DE/FR have a currency    │
//! │  but no tax entry. The fallback sits at the lookup boundary, so no     │
//! │  caller can forget to apply it.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//! use storefront_core::tax::TaxResolver;
//!
//! let resolver = TaxResolver::global();
//!
//! let us = resolver.compute_total(Money::from_major(100), "US");
//! assert_eq!(us.tax, Money::from_major(8));
//! assert_eq!(us.total, Money::from_major(108));
//!
//! // Unmapped for tax, mapped for currency
//! let de = resolver.compute_total(Money::from_major(100), "DE");
//! assert_eq!(de.total, Money::from_major(100));
//! assert_eq!(resolver.currency("DE").as_str(), "EUR");
//! ```
//!
//! ## Thread Safety
//! Tables are never mutated after construction. A `TaxResolver` is
//! `Send + Sync` and can be shared by reference across any number of
//! threads without locking.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CurrencyCode, OrderTotals, TaxRate};
use crate::validation::{validate_region_code, validate_tax_rate_bps};
use crate::DEFAULT_CURRENCY;

// =============================================================================
// Built-in Tables
// =============================================================================

/// US sales tax.
pub const US_SALES_TAX: TaxRate = TaxRate::from_bps(800);

/// Canadian combined sales tax.
pub const CA_SALES_TAX: TaxRate = TaxRate::from_bps(1300);

/// EU value added tax component.
pub const EU_VAT: TaxRate = TaxRate::from_bps(2000);

/// EU digital services tax component.
pub const EU_DIGITAL_SERVICES_TAX: TaxRate = TaxRate::from_bps(300);

const BUILTIN_CURRENCIES: &[(&str, &str)] = &[
    ("US", "USD"),
    ("CA", "CAD"),
    ("EU", "EUR"),
    ("GB", "GBP"),
    ("DE", "EUR"),
    ("FR", "EUR"),
];

// =============================================================================
// Tax Table
// =============================================================================

/// Immutable mapping from region to tax rate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxTable {
    rates: BTreeMap<String, TaxRate>,
}

impl TaxTable {
    /// Builds a table from `(region, rate)` pairs. Later duplicates win.
    pub fn new<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, TaxRate)>,
        K: Into<String>,
    {
        TaxTable {
            rates: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// US 8%, CA 13%, EU 23% (VAT + digital services tax).
    pub fn builtin() -> Self {
        TaxTable::new([
            ("US", US_SALES_TAX),
            ("CA", CA_SALES_TAX),
            ("EU", TaxRate::combined([EU_VAT, EU_DIGITAL_SERVICES_TAX])),
        ])
    }

    /// Exact, case-sensitive lookup.
    #[inline]
    pub fn get(&self, region: &str) -> Option<TaxRate> {
        self.rates.get(region).copied()
    }

    pub fn contains(&self, region: &str) -> bool {
        self.rates.contains_key(region)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries in region order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TaxRate)> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// =============================================================================
// Currency Table
// =============================================================================

/// Immutable mapping from region to currency code, plus the baseline code
/// returned for every unmapped region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTable {
    codes: BTreeMap<String, CurrencyCode>,
    default: CurrencyCode,
}

impl CurrencyTable {
    pub fn new<I, K>(entries: I, default: CurrencyCode) -> Self
    where
        I: IntoIterator<Item = (K, CurrencyCode)>,
        K: Into<String>,
    {
        CurrencyTable {
            codes: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            default,
        }
    }

    /// US, CA, EU, GB, DE, FR with a USD baseline.
    pub fn builtin() -> Self {
        CurrencyTable::new(
            BUILTIN_CURRENCIES
                .iter()
                .map(|&(region, code)| (region, CurrencyCode::from_static(code))),
            CurrencyCode::usd(),
        )
    }

    #[inline]
    pub fn get(&self, region: &str) -> Option<&CurrencyCode> {
        self.codes.get(region)
    }

    pub fn contains(&self, region: &str) -> bool {
        self.codes.contains_key(region)
    }

    /// The code returned for unmapped regions.
    pub fn default_code(&self) -> &CurrencyCode {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CurrencyCode)> {
        self.codes.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        CurrencyTable::new(Vec::<(String, CurrencyCode)>::new(), CurrencyCode::usd())
    }
}

// =============================================================================
// Resolver Configuration
// =============================================================================

/// Serialized form of a resolver, for injecting tables from a file.
///
/// ```json
/// {
///   "defaultCurrency": "USD",
///   "taxRates": { "US": 800, "CA": 1300 },
///   "currencies": { "US": "USD", "CA": "CAD", "DE": "EUR" }
/// }
/// ```
///
/// Rates are basis points. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ResolverConfig {
    #[serde(default = "default_currency_string")]
    pub default_currency: String,

    #[serde(default)]
    pub tax_rates: BTreeMap<String, u32>,

    #[serde(default)]
    pub currencies: BTreeMap<String, String>,
}

fn default_currency_string() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            default_currency: default_currency_string(),
            tax_rates: BTreeMap::new(),
            currencies: BTreeMap::new(),
        }
    }
}

impl From<&TaxResolver> for ResolverConfig {
    fn from(resolver: &TaxResolver) -> Self {
        ResolverConfig {
            default_currency: resolver.currencies.default_code().to_string(),
            tax_rates: resolver
                .taxes
                .iter()
                .map(|(region, rate)| (region.to_string(), rate.bps()))
                .collect(),
            currencies: resolver
                .currencies
                .iter()
                .map(|(region, code)| (region.to_string(), code.to_string()))
                .collect(),
        }
    }
}

// =============================================================================
// Tax Resolver
// =============================================================================

/// Pure tax and currency resolution over two immutable tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxResolver {
    taxes: TaxTable,
    currencies: CurrencyTable,
}

impl TaxResolver {
    pub fn new(taxes: TaxTable, currencies: CurrencyTable) -> Self {
        TaxResolver { taxes, currencies }
    }

    /// Resolver over the built-in tables.
    pub fn builtin() -> Self {
        TaxResolver::new(TaxTable::builtin(), CurrencyTable::builtin())
    }

    /// Process-wide resolver over the built-in tables.
    pub fn global() -> &'static TaxResolver {
        static GLOBAL: OnceLock<TaxResolver> = OnceLock::new();
        GLOBAL.get_or_init(TaxResolver::builtin)
    }

    /// Builds a resolver from injected configuration.
    ///
    /// ## Errors
    /// `CoreError::InvalidConfig` naming the offending entry when a region
    /// key is empty or contains whitespace, a rate exceeds 10000 bps, or a
    /// currency code is not three upper-case letters.
    pub fn from_config(config: &ResolverConfig) -> CoreResult<Self> {
        let default = CurrencyCode::new(config.default_currency.clone())
            .map_err(|e| invalid_entry("defaultCurrency", e))?;

        let mut rates = Vec::with_capacity(config.tax_rates.len());
        for (region, bps) in &config.tax_rates {
            let key = format!("taxRates.{}", region);
            validate_region_code(region).map_err(|e| invalid_entry(&key, e))?;
            validate_tax_rate_bps(*bps).map_err(|e| invalid_entry(&key, e))?;
            rates.push((region.clone(), TaxRate::from_bps(*bps)));
        }

        let mut codes = Vec::with_capacity(config.currencies.len());
        for (region, code) in &config.currencies {
            let key = format!("currencies.{}", region);
            validate_region_code(region).map_err(|e| invalid_entry(&key, e))?;
            let code = CurrencyCode::new(code.clone()).map_err(|e| invalid_entry(&key, e))?;
            codes.push((region.clone(), code));
        }

        Ok(TaxResolver::new(
            TaxTable::new(rates),
            CurrencyTable::new(codes, default),
        ))
    }

    /// Parses a [`ResolverConfig`] from JSON and builds a resolver from it.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: ResolverConfig =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidConfig {
                reason: e.to_string(),
            })?;
        TaxResolver::from_config(&config)
    }

    pub fn taxes(&self) -> &TaxTable {
        &self.taxes
    }

    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    /// Tax rate for a region; zero for any region without an entry,
    /// including `None` and the empty string.
    ///
    /// ```rust
    /// use storefront_core::tax::TaxResolver;
    ///
    /// let resolver = TaxResolver::global();
    /// assert_eq!(resolver.rate("CA").bps(), 1300);
    /// assert!(resolver.rate("ca").is_zero());
    /// assert!(resolver.rate(None::<&str>).is_zero());
    /// ```
    pub fn rate<'r>(&self, region: impl Into<Option<&'r str>>) -> TaxRate {
        let region = region.into();
        match region.and_then(|r| self.taxes.get(r)) {
            Some(rate) => rate,
            None => {
                debug!(?region, table = "tax", "No tax rate configured, using zero");
                TaxRate::zero()
            }
        }
    }

    /// Currency for a region; the baseline code for any region without an
    /// entry.
    pub fn currency<'r>(&self, region: impl Into<Option<&'r str>>) -> &CurrencyCode {
        let region = region.into();
        match region.and_then(|r| self.currencies.get(r)) {
            Some(code) => code,
            None => {
                debug!(
                    ?region,
                    table = "currency",
                    default = %self.currencies.default_code(),
                    "No currency configured, using default"
                );
                self.currencies.default_code()
            }
        }
    }

    /// Computes `tax = subtotal × rate(region)` and `total = subtotal + tax`.
    ///
    /// Zero and negative subtotals are computed, not rejected.
    ///
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::tax::TaxResolver;
    ///
    /// let totals = TaxResolver::global().compute_total(Money::from_major(-50), "US");
    /// assert_eq!(totals.tax, Money::from_major(-4));
    /// assert_eq!(totals.total, Money::from_major(-54));
    /// ```
    pub fn compute_total<'r>(
        &self,
        subtotal: Money,
        region: impl Into<Option<&'r str>>,
    ) -> OrderTotals {
        let tax = subtotal.calculate_tax(self.rate(region));
        OrderTotals::new(subtotal, tax)
    }
}

impl Default for TaxResolver {
    fn default() -> Self {
        TaxResolver::builtin()
    }
}

fn invalid_entry(key: &str, err: ValidationError) -> CoreError {
    CoreError::InvalidConfig {
        reason: format!("{}: {}", key, err),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> &'static TaxResolver {
        TaxResolver::global()
    }

    #[test]
    fn test_us_total() {
        let totals = resolver().compute_total(Money::from_major(100), "US");
        assert_eq!(totals.tax, Money::from_major(8));
        assert_eq!(totals.total, Money::from_major(108));
    }

    #[test]
    fn test_ca_total() {
        let totals = resolver().compute_total(Money::from_major(100), "CA");
        assert_eq!(totals.tax, Money::from_major(13));
        assert_eq!(totals.total, Money::from_major(113));
    }

    #[test]
    fn test_unmapped_eu_country_total_is_untaxed() {
        for region in ["DE", "GB", "FR"] {
            let totals = resolver().compute_total(Money::from_major(100), region);
            assert_eq!(totals.tax, Money::zero(), "{}", region);
            assert_eq!(totals.total, Money::from_major(100), "{}", region);
        }
    }

    #[test]
    fn test_eu_composite_rate() {
        assert_eq!(resolver().rate("EU").bps(), 2300);

        // Todo App Pro License + Premium Support
        let totals = resolver().compute_total(Money::from_cents(4998), "EU");
        assert_eq!(totals.tax.cents(), 1150); // 1149.54 → 1150
        assert_eq!(totals.total.to_decimal_string(), "61.48");
    }

    #[test]
    fn test_zero_subtotal() {
        let totals = resolver().compute_total(Money::zero(), "US");
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::zero());
    }

    #[test]
    fn test_negative_subtotal_preserved() {
        let totals = resolver().compute_total(Money::from_major(-50), "US");
        assert_eq!(totals.subtotal, Money::from_major(-50));
        assert_eq!(totals.tax, Money::from_major(-4));
        assert_eq!(totals.total, Money::from_major(-54));
    }

    #[test]
    fn test_unmapped_regions_rate_zero() {
        for region in ["", "us", "DE", "GB", "FR", "XX", "UNKNOWN", " US", "🇺🇸"] {
            assert!(resolver().rate(region).is_zero(), "{:?}", region);
        }
        assert!(resolver().rate(None::<&str>).is_zero());
    }

    #[test]
    fn test_unmapped_regions_currency_usd() {
        for region in ["", "us", "XX", "UNKNOWN", "cad"] {
            assert_eq!(resolver().currency(region).as_str(), "USD", "{:?}", region);
        }
        assert_eq!(resolver().currency(None::<&str>).as_str(), "USD");
    }

    #[test]
    fn test_mapped_currencies() {
        let expected = [
            ("US", "USD"),
            ("CA", "CAD"),
            ("GB", "GBP"),
            ("DE", "EUR"),
            ("FR", "EUR"),
        ];
        for (region, code) in expected {
            assert_eq!(resolver().currency(region).as_str(), code);
        }
    }

    #[test]
    fn test_tables_have_independent_keys() {
        let r = resolver();
        assert!(r.currencies().contains("DE"));
        assert!(!r.taxes().contains("DE"));
    }

    #[test]
    fn test_total_invariant_for_any_region() {
        let regions = ["US", "CA", "EU", "DE", "", "nowhere"];
        let subtotals = [i64::MIN / 2, -1, 0, 1, 4998, 10_000, i64::MAX / 2];
        for region in regions {
            for cents in subtotals {
                let subtotal = Money::from_cents(cents);
                let totals = resolver().compute_total(subtotal, region);
                assert_eq!(totals.subtotal, subtotal);
                assert_eq!(totals.total, totals.subtotal + totals.tax);
            }
        }
    }

    #[test]
    fn test_compute_total_at_i64_extremes() {
        let regions = ["US", "CA", "EU", "GB", "DE", "FR", ""];
        for region in regions {
            let rate = resolver().rate(region);

            let max = resolver().compute_total(Money::from_cents(i64::MAX), region);
            assert_eq!(max.subtotal.cents(), i64::MAX);
            assert_eq!(max.total.cents(), i64::MAX, "{}", region);
            assert_eq!(max.tax.is_zero(), rate.is_zero());

            let min = resolver().compute_total(Money::from_cents(i64::MIN), region);
            assert_eq!(min.total.cents(), i64::MIN, "{}", region);
            assert!(!min.tax.is_positive());
        }
    }

    #[test]
    fn test_largest_parsed_subtotal_keeps_exact_total() {
        let subtotal = Money::from_cents(crate::MAX_AMOUNT_CENTS);
        let totals = resolver().compute_total(subtotal, "EU");
        assert_eq!(totals.tax.cents(), crate::MAX_AMOUNT_CENTS / 100 * 23);
        assert_eq!(totals.total.cents(), subtotal.cents() + totals.tax.cents());
    }

    #[test]
    fn test_compute_total_is_idempotent() {
        let first = resolver().compute_total(Money::from_cents(12_345), "CA");
        let second = resolver().compute_total(Money::from_cents(12_345), "CA");
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_use_is_consistent() {
        let r = resolver();
        let expected = r.compute_total(Money::from_major(100), "US");

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || r.compute_total(Money::from_major(100), "US")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn test_from_json() {
        let resolver = TaxResolver::from_json(
            r#"{
                "defaultCurrency": "EUR",
                "taxRates": { "DE": 1900, "FR": 2000 },
                "currencies": { "GB": "GBP" }
            }"#,
        )
        .unwrap();

        let de = resolver.compute_total(Money::from_major(100), "DE");
        assert_eq!(de.total, Money::from_major(119));
        assert!(resolver.rate("US").is_zero());
        assert_eq!(resolver.currency("GB").as_str(), "GBP");
        assert_eq!(resolver.currency("DE").as_str(), "EUR");
    }

    #[test]
    fn test_from_json_defaults() {
        let resolver = TaxResolver::from_json("{}").unwrap();
        assert!(resolver.taxes().is_empty());
        assert!(resolver.currencies().is_empty());
        assert_eq!(resolver.currency("US").as_str(), "USD");
    }

    #[test]
    fn test_from_json_rejects_bad_entries() {
        let cases = [
            (r#"{ "taxRates": { "US": 10001 } }"#, "taxRates.US"),
            (r#"{ "taxRates": { "": 800 } }"#, "taxRates."),
            (r#"{ "currencies": { "CA": "cad" } }"#, "currencies.CA"),
            (r#"{ "defaultCurrency": "DOLLARS" }"#, "defaultCurrency"),
        ];
        for (json, key) in cases {
            match TaxResolver::from_json(json) {
                Err(CoreError::InvalidConfig { reason }) => {
                    assert!(reason.starts_with(key), "{} → {}", json, reason)
                }
                other => panic!("expected InvalidConfig for {}, got {:?}", json, other),
            }
        }

        assert!(matches!(
            TaxResolver::from_json("not json"),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(matches!(
            TaxResolver::from_json(r#"{ "taxRates": { "US": -1 } }"#),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(matches!(
            TaxResolver::from_json(r#"{ "rates": {} }"#),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_config_roundtrips_builtin() {
        let config = ResolverConfig::from(TaxResolver::global());
        assert_eq!(config.tax_rates.get("EU"), Some(&2300));
        assert_eq!(TaxResolver::from_config(&config).unwrap(), TaxResolver::builtin());
    }
}
