//! Validated ISO 4217 style currency codes.

use super::CurrencyDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-letter currency code stored in upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Required code length.
    pub const LENGTH: usize = 3;

    /// Parses a code, trimming whitespace and normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyDomainError::InvalidCode`] unless the trimmed input
    /// is exactly three ASCII letters.
    pub fn new(value: &str) -> Result<Self, CurrencyDomainError> {
        let trimmed = value.trim();
        if trimmed.len() != Self::LENGTH || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(CurrencyDomainError::InvalidCode(value.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
