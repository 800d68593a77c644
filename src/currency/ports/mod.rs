//! Port contracts for currency rate retrieval.

pub mod http;

pub use http::{HttpFetch, HttpFetchError, HttpFetchResult, HttpResponse};
