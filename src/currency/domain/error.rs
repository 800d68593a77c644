//! Error types for currency domain validation.

use thiserror::Error;

/// Errors returned while constructing currency values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurrencyDomainError {
    /// The code is not three ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCode(String),
}
