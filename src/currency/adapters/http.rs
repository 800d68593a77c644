//! `reqwest`-backed implementation of the HTTP fetch port.

use crate::currency::ports::{HttpFetch, HttpFetchError, HttpFetchResult, HttpResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// HTTP client with a whole-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestHttpFetch {
    client: reqwest::Client,
}

impl ReqwestHttpFetch {
    /// Builds a client whose requests fail after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpFetchError::Transport`] when the TLS backend cannot be
    /// initialised.
    pub fn new(timeout: Duration) -> HttpFetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpFetchError::transport)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestHttpFetch {
    async fn get(&self, url: &str) -> HttpFetchResult<HttpResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(HttpFetchError::transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(HttpFetchError::transport)?;
        debug!(url, status, bytes = body.len(), "upstream response received");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
