//! In-memory exchange rate table.

use std::collections::HashMap;

use fxconv_common::Currency;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FxError, FxResult};

/// Code of the base currency every rate is quoted against.
pub const BASE_CURRENCY: &str = "USD";

/// Rates a fresh table starts with, in display order.
pub const DEFAULT_RATES: [(&str, f64); 5] = [
    ("USD", 1.0),
    ("EUR", 0.92),
    ("INR", 82.67),
    ("GBP", 0.78),
    ("JPY", 130.5),
];

/// One row of a rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// Currency code.
    pub code: Currency,
    /// Units of this currency per one unit of the base currency.
    pub rate: f64,
}

/// Rates keyed by currency, relative to [`BASE_CURRENCY`].
///
/// The base currency is always present at exactly 1.0 and every other
/// rate is finite and positive. Codes keep their first insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<RateEntry>", try_from = "Vec<RateEntry>")]
pub struct RateTable {
    entries: Vec<RateEntry>,
    index: HashMap<Currency, usize>,
}

impl RateTable {
    /// Create a table holding only the base currency.
    pub fn new() -> Self {
        let base = Currency::new(BASE_CURRENCY);
        let mut index = HashMap::new();
        index.insert(base.clone(), 0);

        Self {
            entries: vec![RateEntry {
                code: base,
                rate: 1.0,
            }],
            index,
        }
    }

    /// Get the base currency.
    pub fn base(&self) -> &Currency {
        &self.entries[0].code
    }

    /// Get the rate for a currency.
    pub fn get(&self, code: impl AsRef<str>) -> FxResult<f64> {
        let currency = Currency::new(code.as_ref());
        match self.index.get(&currency) {
            Some(&idx) => Ok(self.entries[idx].rate),
            None => {
                debug!(currency = %currency, "Rate lookup miss");
                Err(FxError::UnknownCurrency(currency))
            }
        }
    }

    /// Insert or overwrite the rate for a currency.
    ///
    /// Overwriting keeps the currency's existing position in [`codes`](Self::codes).
    pub fn set(&mut self, code: impl AsRef<str>, rate: f64) -> FxResult<()> {
        let currency = Currency::parse(code.as_ref())?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(FxError::InvalidRate {
                currency,
                rate,
                reason: "rate must be a finite number greater than zero",
            });
        }

        if &currency == self.base() && rate != 1.0 {
            return Err(FxError::InvalidRate {
                currency,
                rate,
                reason: "base currency rate is fixed at 1.0",
            });
        }

        match self.upsert(currency.clone(), rate) {
            Some(previous) => {
                info!(currency = %currency, previous, rate, "Updated exchange rate")
            }
            None => info!(currency = %currency, rate, "Added exchange rate"),
        }

        Ok(())
    }

    /// Check whether a currency is registered.
    pub fn contains(&self, code: impl AsRef<str>) -> bool {
        self.index.contains_key(&Currency::new(code.as_ref()))
    }

    /// Registered currency codes in insertion order.
    pub fn codes(&self) -> impl Iterator<Item = &Currency> + '_ {
        self.entries.iter().map(|e| &e.code)
    }

    /// Registered (code, rate) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Currency, f64)> + '_ {
        self.entries.iter().map(|e| (&e.code, e.rate))
    }

    /// Number of registered currencies, base included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the base currency is never removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or overwrite without validation, returning the previous rate.
    fn upsert(&mut self, currency: Currency, rate: f64) -> Option<f64> {
        if let Some(&idx) = self.index.get(&currency) {
            return Some(std::mem::replace(&mut self.entries[idx].rate, rate));
        }

        self.index.insert(currency.clone(), self.entries.len());
        self.entries.push(RateEntry {
            code: currency,
            rate,
        });
        None
    }
}

impl Default for RateTable {
    /// The table with [`DEFAULT_RATES`] loaded.
    fn default() -> Self {
        let mut table = Self::new();
        for (code, rate) in DEFAULT_RATES {
            table.upsert(Currency::new(code), rate);
        }
        table
    }
}

impl From<RateTable> for Vec<RateEntry> {
    fn from(table: RateTable) -> Self {
        table.entries
    }
}

impl TryFrom<Vec<RateEntry>> for RateTable {
    type Error = FxError;

    fn try_from(entries: Vec<RateEntry>) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for entry in entries {
            table.set(entry.code.code(), entry.rate)?;
        }
        Ok(table)
    }
}
