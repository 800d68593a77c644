//! Application services for cached currency rate lookups.

mod cache;
mod rates;

pub use cache::TtlCache;
pub use rates::{
    CurrencyCacheSettings, CurrencyRateService, CurrencyServiceError, CurrencyServiceResult,
    DEFAULT_RATES_URL, RateFetchError,
};
