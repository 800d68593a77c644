//! Currency codes and the upstream rate document.

mod code;
mod error;
mod rates;

pub use code::CurrencyCode;
pub use error::CurrencyDomainError;
pub use rates::{CurrencyRate, RateDocument};
