//! CLI configuration.

use std::str::FromStr;

use fxconv_common::Currency;
use fxconv_fx::{FxResult, RateTable};
use thiserror::Error;

/// A `CODE=RATE` override applied on top of the default rates.
#[derive(Debug, Clone, PartialEq)]
pub struct RateOverride {
    pub currency: Currency,
    pub rate: f64,
}

/// Error parsing a `CODE=RATE` override.
#[derive(Debug, Error, PartialEq)]
pub enum RateOverrideError {
    #[error("Expected CODE=RATE, got {0:?}")]
    MissingSeparator(String),

    #[error("Invalid rate {rate:?} for {code}")]
    InvalidNumber { code: String, rate: String },

    #[error(transparent)]
    InvalidCode(#[from] fxconv_common::CurrencyCodeError),
}

impl FromStr for RateOverride {
    type Err = RateOverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, rate) = s
            .split_once('=')
            .ok_or_else(|| RateOverrideError::MissingSeparator(s.to_string()))?;

        let currency = Currency::parse(code)?;
        let rate = rate
            .trim()
            .parse::<f64>()
            .map_err(|_| RateOverrideError::InvalidNumber {
                code: currency.to_string(),
                rate: rate.to_string(),
            })?;

        Ok(Self { currency, rate })
    }
}

/// Parse a comma-separated list of overrides, e.g. `EUR=0.95,GBP=0.8`.
pub fn parse_overrides(list: &str) -> Result<Vec<RateOverride>, RateOverrideError> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(RateOverride::from_str)
        .collect()
}

/// Main CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON.
    pub log_json: bool,
    /// Rates applied over the defaults, in order.
    pub rate_overrides: Vec<RateOverride>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_json: false,
            rate_overrides: Vec::new(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, RateOverrideError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RateOverrideError> {
        let mut config = Self::default();

        if let Some(level) = lookup("FXCONV_LOG_LEVEL") {
            config.log_level = level;
        }

        if let Some(json) = lookup("FXCONV_LOG_JSON") {
            config.log_json = matches!(json.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        if let Some(rates) = lookup("FXCONV_RATES") {
            config.rate_overrides = parse_overrides(&rates)?;
        }

        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

        if !LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!("Unknown log level: {}", self.log_level));
        }

        if let Some(bad) = self
            .rate_overrides
            .iter()
            .find(|o| !o.rate.is_finite() || o.rate <= 0.0)
        {
            return Err(format!("Rate for {} must be positive, got {}", bad.currency, bad.rate));
        }

        Ok(())
    }

    /// Build the rate table: defaults, then overrides in order.
    pub fn rate_table(&self) -> FxResult<RateTable> {
        let mut table = RateTable::default();
        for o in &self.rate_overrides {
            table.set(o.currency.code(), o.rate)?;
        }
        Ok(table)
    }
}
