//! Minimal HTTP GET port used to download rate documents.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for HTTP fetch operations.
pub type HttpFetchResult<T> = Result<T, HttpFetchError>;

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Outbound HTTP contract.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// Issues a GET request and returns the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`HttpFetchError::Transport`] when no response was received.
    async fn get(&self, url: &str) -> HttpFetchResult<HttpResponse>;
}

/// Errors returned by HTTP fetch implementations.
#[derive(Debug, Clone, Error)]
pub enum HttpFetchError {
    /// The request could not be completed.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl HttpFetchError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
