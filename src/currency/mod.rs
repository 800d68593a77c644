//! Currency exchange rates with an in-memory time-to-live cache.
//!
//! Rates are read from an upstream JSON document through the
//! [`ports::HttpFetch`] port. [`services::CurrencyRateService`] keeps the
//! whole document and individual rates cached so that repeated lookups within
//! the configured lifetime never reach the network.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
