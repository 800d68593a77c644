//! Rate document published by the upstream daily rates endpoint.
//!
//! Field names follow the upstream JSON exactly. Fields this crate does not
//! model are kept in `extra` so that a document survives a
//! deserialize/serialize cycle unchanged.

use super::CurrencyCode;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Exchange rate of one currency against the publisher's base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    /// Publisher's internal identifier.
    #[serde(rename = "ID")]
    pub id: String,
    /// Numeric ISO code, as published.
    #[serde(rename = "NumCode")]
    pub num_code: String,
    /// Alphabetic code.
    #[serde(rename = "CharCode")]
    pub char_code: String,
    /// Number of units the rate is quoted for.
    #[serde(rename = "Nominal")]
    pub nominal: u32,
    /// Human-readable currency name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Current rate for `nominal` units.
    #[serde(rename = "Value")]
    pub value: f64,
    /// Rate from the previous publication.
    #[serde(rename = "Previous")]
    pub previous: f64,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full daily rate publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDocument {
    /// Publication date.
    #[serde(rename = "Date")]
    pub date: DateTime<FixedOffset>,
    /// Date of the previous publication.
    #[serde(rename = "PreviousDate")]
    pub previous_date: DateTime<FixedOffset>,
    /// Location of the previous publication.
    #[serde(rename = "PreviousURL")]
    pub previous_url: String,
    /// Time the document was generated.
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    /// Rates keyed by alphabetic code.
    #[serde(rename = "Valute")]
    pub valute: BTreeMap<String, CurrencyRate>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RateDocument {
    /// Looks up the rate for `code`.
    #[must_use]
    pub fn rate(&self, code: &CurrencyCode) -> Option<&CurrencyRate> {
        self.valute.get(code.as_str())
    }

    /// Number of currencies in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.valute.len()
    }

    /// Returns `true` when the document lists no currencies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.valute.is_empty()
    }
}
