//! Currency conversion types and operations.

use std::fmt;

use fxconv_common::Currency;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{FxError, FxResult};
use crate::rate_table::RateTable;

/// Convert `amount` from one currency to another using `table`.
///
/// Checks run in order: identical currencies, non-finite amount, then
/// unregistered codes. The result is `amount * (to_rate / from_rate)` with
/// no rounding; overflow produces infinity rather than an error.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> FxResult<f64> {
    quote(amount, from, to, table).map(|c| c.converted)
}

/// Like [`convert`], but with the amount given as user-entered text.
pub fn convert_str(amount: &str, from: &str, to: &str, table: &RateTable) -> FxResult<f64> {
    ConversionRequest::from_text(amount, from, to).execute(table).map(|c| c.converted)
}

/// Convert and return the full [`Conversion`] record.
#[instrument(skip(table), level = "debug")]
pub fn quote(amount: f64, from: &str, to: &str, table: &RateTable) -> FxResult<Conversion> {
    let from = Currency::new(from);
    let to = Currency::new(to);

    if from == to {
        return Err(FxError::SameCurrency(from));
    }

    if !amount.is_finite() {
        return Err(FxError::InvalidAmount(amount.to_string()));
    }

    let from_rate = table.get(&from)?;
    let to_rate = table.get(&to)?;

    let rate = to_rate / from_rate;
    let converted = amount * rate;

    debug!(rate, converted, "Conversion completed");

    Ok(Conversion {
        amount,
        from,
        to,
        rate,
        converted,
    })
}

/// Parse a user-entered amount.
///
/// Surrounding whitespace is ignored; anything that is not a finite number
/// is rejected.
pub fn parse_amount(text: &str) -> FxResult<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FxError::InvalidAmount(text.to_string())),
    }
}

/// Render an amount with exactly two decimal places.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// A completed currency conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    /// Input amount.
    pub amount: f64,
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
    /// Units of `to` per unit of `from`.
    pub rate: f64,
    /// Output amount, unrounded.
    pub converted: f64,
}

impl Conversion {
    /// Output amount formatted for display.
    pub fn display_amount(&self) -> String {
        format_amount(self.converted)
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Converted Amount: {}", self.display_amount())
    }
}

/// Amount to convert, where the amount may still be unparsed text.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Amount to convert.
    pub amount: Amount,
    /// Source currency.
    pub from: Currency,
    /// Target currency.
    pub to: Currency,
}

/// Amount as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Amount {
    /// Already-numeric amount.
    Value(f64),
    /// Raw text, parsed when the request runs.
    Text(String),
}

impl ConversionRequest {
    /// Create a request for a numeric amount.
    pub fn new(amount: f64, from: impl Into<Currency>, to: impl Into<Currency>) -> Self {
        Self {
            amount: Amount::Value(amount),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a request for an amount still in text form.
    ///
    /// Parsing is deferred to [`execute`](Self::execute) so that an
    /// identical currency pair is reported before a bad amount.
    pub fn from_text(amount: &str, from: &str, to: &str) -> Self {
        Self {
            amount: Amount::Text(amount.to_string()),
            from: Currency::new(from),
            to: Currency::new(to),
        }
    }

    /// Run the request against a rate table.
    pub fn execute(&self, table: &RateTable) -> FxResult<Conversion> {
        if self.from == self.to {
            return Err(FxError::SameCurrency(self.from.clone()));
        }

        let amount = match &self.amount {
            Amount::Value(v) => *v,
            Amount::Text(text) => parse_amount(text)?,
        };

        quote(amount, self.from.code(), self.to.code(), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    fn scenario_table() -> RateTable {
        let mut table = RateTable::new();
        table.set("EUR", 0.92).unwrap();
        table.set("INR", 82.67).unwrap();
        table
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= TOLERANCE * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_usd_to_eur() {
        let table = scenario_table();

        let eur = convert(100.0, "USD", "EUR", &table).unwrap();

        assert!(approx_eq(eur, 92.0));
        assert_eq!(format_amount(eur), "92.00");
    }

    #[test]
    fn test_eur_to_usd() {
        let table = scenario_table();

        let usd = convert(100.0, "EUR", "USD", &table).unwrap();

        assert_eq!(format_amount(usd), "108.70");
    }

    #[test]
    fn test_same_currency_rejected() {
        let table = scenario_table();

        let result = convert(10.0, "USD", "USD", &table);

        assert_eq!(result, Err(FxError::SameCurrency(Currency::usd())));
    }

    #[test]
    fn test_same_currency_ignores_case() {
        let table = scenario_table();
        assert!(matches!(
            convert(10.0, "eur", "EUR", &table),
            Err(FxError::SameCurrency(_))
        ));
    }

    #[test]
    fn test_unknown_currency() {
        let table = scenario_table();

        assert_eq!(
            convert(10.0, "USD", "CHF", &table),
            Err(FxError::UnknownCurrency(Currency::new("CHF")))
        );
        assert_eq!(
            convert(10.0, "XYZ", "USD", &table),
            Err(FxError::UnknownCurrency(Currency::new("XYZ")))
        );
    }

    #[test]
    fn test_non_finite_amount() {
        let table = scenario_table();

        assert!(matches!(
            convert(f64::NAN, "USD", "EUR", &table),
            Err(FxError::InvalidAmount(_))
        ));
        assert!(matches!(
            convert(f64::INFINITY, "USD", "EUR", &table),
            Err(FxError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_check_order() {
        let table = scenario_table();

        // Identical codes win over a bad amount and an unknown code.
        assert!(matches!(
            convert_str("abc", "XYZ", "XYZ", &table),
            Err(FxError::SameCurrency(_))
        ));
        // A bad amount wins over an unknown code.
        assert!(matches!(
            convert_str("abc", "USD", "XYZ", &table),
            Err(FxError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_convert_str() {
        let table = scenario_table();

        assert_eq!(format_amount(convert_str(" 100 ", "USD", "EUR", &table).unwrap()), "92.00");
        assert!(matches!(
            convert_str("abc", "USD", "EUR", &table),
            Err(FxError::InvalidAmount(_))
        ));
        assert!(matches!(
            convert_str("", "USD", "EUR", &table),
            Err(FxError::InvalidAmount(_))
        ));
        assert!(matches!(
            convert_str("NaN", "USD", "EUR", &table),
            Err(FxError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_rate_update_applies() {
        let mut table = scenario_table();
        table.set("EUR", 0.95).unwrap();

        let eur = convert(100.0, "USD", "EUR", &table).unwrap();

        assert_eq!(format_amount(eur), "95.00");
    }

    #[test]
    fn test_overflow_propagates() {
        let table = RateTable::default();

        let result = convert(f64::MAX, "USD", "JPY", &table).unwrap();

        assert!(result.is_infinite());
    }

    #[test]
    fn test_conversion_record() {
        let table = RateTable::default();

        let conversion = quote(100.0, "usd", "eur", &table).unwrap();

        assert_eq!(conversion.from, Currency::usd());
        assert_eq!(conversion.to, Currency::eur());
        assert!(approx_eq(conversion.rate, 0.92));
        assert_eq!(conversion.to_string(), "Converted Amount: 92.00");
    }

    #[test]
    fn test_deserialized_conversion_normalizes_codes() {
        let json = r#"{"amount":10.0,"from":"usd","to":"USD","rate":1.0,"converted":10.0}"#;

        let conversion: Conversion = serde_json::from_str(json).unwrap();

        assert_eq!(conversion.from, Currency::usd());
        assert_eq!(conversion.from, conversion.to);
    }

    #[test]
    fn test_request_execute() {
        let table = RateTable::default();

        let conversion = ConversionRequest::new(1000.0, "GBP", "INR")
            .execute(&table)
            .unwrap();

        assert!(approx_eq(conversion.converted, 1000.0 * (82.67 / 0.78)));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1.5), "1.50");
        assert_eq!(format_amount(-2.345678), "-2.35");
        assert_eq!(format_amount(13050.0), "13050.00");
    }

    fn registered_pair() -> impl Strategy<Value = (String, String)> {
        let codes: Vec<String> = RateTable::default().codes().map(|c| c.to_string()).collect();
        let n = codes.len();
        (0..n, 1..n).prop_map(move |(i, offset)| {
            (codes[i].clone(), codes[(i + offset) % n].clone())
        })
    }

    proptest! {
        #[test]
        fn prop_same_currency_always_rejected(amount in 0.0f64..1e9, idx in 0usize..5) {
            let table = RateTable::default();
            let code = table.codes().nth(idx).unwrap().to_string();

            prop_assert!(matches!(
                convert(amount, &code, &code, &table),
                Err(FxError::SameCurrency(_))
            ));
        }

        #[test]
        fn prop_matches_rate_ratio(amount in 0.0f64..1e9, (from, to) in registered_pair()) {
            let table = RateTable::default();

            let result = convert(amount, &from, &to, &table).unwrap();
            let expected = amount * table.get(&to).unwrap() / table.get(&from).unwrap();

            prop_assert!(approx_eq(result, expected), "{result} != {expected}");
        }

        #[test]
        fn prop_round_trip(amount in 0.0f64..1e9, (from, to) in registered_pair()) {
            let table = RateTable::default();

            let there = convert(amount, &from, &to, &table).unwrap();
            let back = convert(there, &to, &from, &table).unwrap();

            prop_assert!(approx_eq(back, amount), "{back} != {amount}");
        }

        #[test]
        fn prop_non_numeric_text_rejected(text in "[a-zA-Z]{1,8}") {
            let table = RateTable::default();

            prop_assert!(matches!(
                convert_str(&text, "USD", "EUR", &table),
                Err(FxError::InvalidAmount(_))
            ));
        }
    }
}
