//! FX engine error types.

use fxconv_common::{Currency, CurrencyCodeError};
use thiserror::Error;

/// Errors that can occur while converting or updating rates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FxError {
    /// Amount is not a parseable finite number.
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Source and target currencies are the same.
    #[error("Source and target currencies are both {0}")]
    SameCurrency(Currency),

    /// Currency is not registered in the rate table.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(Currency),

    /// Rate rejected by the table.
    #[error("Invalid rate {rate} for {currency}: {reason}")]
    InvalidRate {
        currency: Currency,
        rate: f64,
        reason: &'static str,
    },

    /// Currency code rejected by the table.
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(#[from] CurrencyCodeError),
}

impl FxError {
    /// Get error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            FxError::InvalidAmount(_) => "INVALID_AMOUNT",
            FxError::SameCurrency(_) => "SAME_CURRENCY",
            FxError::UnknownCurrency(_) => "UNKNOWN_CURRENCY",
            FxError::InvalidRate { .. } => "INVALID_RATE",
            FxError::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
        }
    }

    /// Message shown to an end user by a front end.
    pub fn user_message(&self) -> String {
        match self {
            FxError::InvalidAmount(_) => "Please enter a valid numeric amount.".to_string(),
            FxError::SameCurrency(_) => {
                "Source and target currencies must be different.".to_string()
            }
            FxError::UnknownCurrency(code) => format!("Currency {} is not supported.", code),
            other => other.to_string(),
        }
    }
}

/// Result type for FX operations.
pub type FxResult<T> = Result<T, FxError>;
