//! Error types for currency codes.

use thiserror::Error;

/// Error returned when text is not a well-formed currency code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyCodeError {
    /// Code was empty after trimming.
    #[error("Currency code is empty")]
    Empty,

    /// Code does not have exactly three characters.
    #[error("Currency code {code:?} must be 3 letters, got {len}")]
    WrongLength { code: String, len: usize },

    /// Code contains something other than ASCII letters.
    #[error("Currency code {0:?} must contain only ASCII letters")]
    InvalidCharacter(String),
}

impl CurrencyCodeError {
    /// Get error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            CurrencyCodeError::Empty => "EMPTY_CURRENCY_CODE",
            CurrencyCodeError::WrongLength { .. } => "CURRENCY_CODE_LENGTH",
            CurrencyCodeError::InvalidCharacter(_) => "CURRENCY_CODE_CHARACTER",
        }
    }
}
