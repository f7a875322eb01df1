//! fxconv FX Engine
//!
//! Converts amounts between currencies using an in-memory rate table.
//!
//! # Features
//!
//! - Rates expressed relative to a fixed base currency (USD = 1.0)
//! - Validated insert/overwrite of single rates
//! - Structured errors for every rejected conversion
//!
//! # Example
//!
//! ```rust
//! use fxconv_fx::{convert, format_amount, RateTable};
//!
//! let mut table = RateTable::default();
//! let eur = convert(100.0, "USD", "EUR", &table)?;
//! assert_eq!(format_amount(eur), "92.00");
//!
//! table.set("EUR", 0.95)?;
//! assert_eq!(format_amount(convert(100.0, "USD", "EUR", &table)?), "95.00");
//! # Ok::<(), fxconv_fx::FxError>(())
//! ```

pub mod conversion;
pub mod error;
pub mod rate_table;

pub use conversion::{
    convert, convert_str, format_amount, parse_amount, quote, Amount, Conversion, ConversionRequest,
};
pub use error::{FxError, FxResult};
pub use rate_table::{RateEntry, RateTable, BASE_CURRENCY, DEFAULT_RATES};
