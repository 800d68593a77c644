//! Scripted HTTP fetch double for tests and offline runs.

use crate::currency::ports::{HttpFetch, HttpFetchError, HttpFetchResult, HttpResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<HttpFetchResult<HttpResponse>>,
    requests: Vec<String>,
}

/// Error returned when a request arrives with nothing scripted.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("no scripted response left")]
pub struct ScriptExhausted;

/// HTTP fetch double that replays queued outcomes in order.
///
/// Every request is recorded, including those that fail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHttpFetch {
    script: Arc<Mutex<Script>>,
}

impl InMemoryHttpFetch {
    /// Creates a double with nothing queued.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a response.
    pub fn push_response(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.lock()
            .queued
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queues a transport failure.
    pub fn push_error(&self, err: HttpFetchError) {
        self.lock().queued.push_back(Err(err));
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// URLs requested so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }
}

#[async_trait]
impl HttpFetch for InMemoryHttpFetch {
    async fn get(&self, url: &str) -> HttpFetchResult<HttpResponse> {
        let mut script = self.lock();
        script.requests.push(url.to_owned());
        script
            .queued
            .pop_front()
            .unwrap_or_else(|| Err(HttpFetchError::transport(ScriptExhausted)))
    }
}
