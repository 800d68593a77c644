//! Cache-aside access to the upstream rate document.

use super::TtlCache;
use crate::currency::{
    domain::{CurrencyCode, CurrencyDomainError, CurrencyRate, RateDocument},
    ports::{HttpFetch, HttpFetchError},
};
use crate::error::ErrorKind;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Endpoint used when no rates URL is configured.
pub const DEFAULT_RATES_URL: &str = "https://www.cbr-xml-daily.ru/daily_json.js";

const DOCUMENT_KEY: &str = "all";

/// Upstream location and cache lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyCacheSettings {
    /// URL of the daily rate document.
    pub url: String,
    /// Lifetime of cached documents and rates.
    pub ttl: Duration,
}

impl CurrencyCacheSettings {
    /// Lifetime used when none is configured.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    /// Creates settings for the given URL with the default lifetime.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ttl: Self::DEFAULT_TTL,
        }
    }

    /// Replaces the cache lifetime.
    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CurrencyCacheSettings {
    fn default() -> Self {
        Self::new(DEFAULT_RATES_URL)
    }
}

/// Reasons a rate document could not be obtained.
#[derive(Debug, Clone, Error)]
pub enum RateFetchError {
    /// No response was received.
    #[error(transparent)]
    Transport(#[from] HttpFetchError),
    /// The upstream answered with a non-success status.
    #[error("upstream returned status {status}")]
    UnexpectedStatus {
        /// Received status code.
        status: u16,
    },
    /// The body is not a valid rate document.
    #[error("malformed rate document: {0}")]
    MalformedBody(Arc<serde_json::Error>),
}

/// Service-level errors for currency lookups.
#[derive(Debug, Clone, Error)]
pub enum CurrencyServiceError {
    /// The requested code is malformed.
    #[error(transparent)]
    InvalidCode(#[from] CurrencyDomainError),
    /// The upstream document does not list the code.
    #[error("currency {0} not found")]
    NotFound(CurrencyCode),
    /// The rate document could not be fetched.
    #[error("failed to fetch currency rates: {0}")]
    Fetch(#[from] RateFetchError),
}

impl CurrencyServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCode(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Fetch(_) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for currency service operations.
pub type CurrencyServiceResult<T> = Result<T, CurrencyServiceError>;

/// Serves rate lookups from a TTL cache in front of the upstream document.
///
/// Concurrent misses on the full document share one upstream request.
pub struct CurrencyRateService<H, C>
where
    H: HttpFetch + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    fetch: Arc<H>,
    url: String,
    documents: TtlCache<&'static str, Arc<RateDocument>, C>,
    rates: TtlCache<CurrencyCode, CurrencyRate, C>,
    refresh: Mutex<()>,
}

impl<H, C> CurrencyRateService<H, C>
where
    H: HttpFetch + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    /// Creates a service with empty caches.
    #[must_use]
    pub fn new(fetch: Arc<H>, clock: Arc<C>, settings: CurrencyCacheSettings) -> Self {
        let ttl = chrono::Duration::from_std(settings.ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            fetch,
            url: settings.url,
            documents: TtlCache::new(ttl, Arc::clone(&clock)),
            rates: TtlCache::new(ttl, clock),
            refresh: Mutex::new(()),
        }
    }

    /// Returns the full rate document, refreshing it when the cached copy has
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyServiceError::Fetch`] when the upstream cannot be
    /// reached, answers with a non-success status, or returns a body that is
    /// not a rate document. Nothing is cached in that case.
    pub async fn get_all(&self) -> CurrencyServiceResult<Arc<RateDocument>> {
        if let Some(document) = self.documents.get(&DOCUMENT_KEY) {
            debug!("currency rates served from cache");
            return Ok(document);
        }

        let _refreshing = self.refresh.lock().await;
        if let Some(document) = self.documents.get(&DOCUMENT_KEY) {
            debug!("currency rates refreshed by concurrent request");
            return Ok(document);
        }

        let document = Arc::new(self.fetch_document().await.inspect_err(|err| {
            warn!(url = %self.url, error = %err, "currency rate refresh failed");
        })?);
        self.documents.insert(DOCUMENT_KEY, Arc::clone(&document));
        info!(currencies = document.len(), "currency rates refreshed");
        Ok(document)
    }

    /// Returns the rate for one currency.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyServiceError::InvalidCode`] for malformed codes,
    /// [`CurrencyServiceError::NotFound`] when the document does not list the
    /// code, and [`CurrencyServiceError::Fetch`] when the document cannot be
    /// obtained.
    pub async fn get_one(&self, code: &str) -> CurrencyServiceResult<CurrencyRate> {
        let wanted = CurrencyCode::new(code)?;
        if let Some(rate) = self.rates.get(&wanted) {
            debug!(code = %wanted, "currency rate served from cache");
            return Ok(rate);
        }

        let document = self.get_all().await?;
        let Some(rate) = document.rate(&wanted).cloned() else {
            return Err(CurrencyServiceError::NotFound(wanted));
        };
        self.rates.insert(wanted, rate.clone());
        Ok(rate)
    }

    async fn fetch_document(&self) -> Result<RateDocument, RateFetchError> {
        let response = self.fetch.get(&self.url).await?;
        if !response.is_success() {
            return Err(RateFetchError::UnexpectedStatus {
                status: response.status,
            });
        }
        serde_json::from_slice(&response.body)
            .map_err(|err| RateFetchError::MalformedBody(Arc::new(err)))
    }
}
