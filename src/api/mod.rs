//! REST surface over the task service and the currency rate cache.
//!
//! Routes live under `/api/tasks` and `/api/currency`. Service errors are
//! mapped to status codes by kind and rendered as `{"error": "<message>"}`.

mod currency;
mod error;
mod routes;
mod tasks;

pub use error::ApiError;
pub use routes::{AppState, SharedCurrencyService, SharedTaskService, router};
