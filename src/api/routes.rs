//! Shared state and router assembly.

use super::{currency, tasks};
use crate::currency::{
    ports::HttpFetch,
    services::{CurrencyCacheSettings, CurrencyRateService},
};
use crate::task::{ports::TaskRepository, services::TaskLifecycleService};
use axum::Router;
use mockable::Clock;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Task service over type-erased adapters.
pub type SharedTaskService = TaskLifecycleService<dyn TaskRepository, dyn Clock + Send + Sync>;

/// Currency service over type-erased adapters.
pub type SharedCurrencyService = CurrencyRateService<dyn HttpFetch, dyn Clock + Send + Sync>;

/// Services shared by every request handler.
pub struct AppState {
    /// Task CRUD and listings.
    pub tasks: SharedTaskService,
    /// Cached currency rates.
    pub currency: SharedCurrencyService,
}

impl AppState {
    /// Wires both services around the given adapters and clock.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        fetch: Arc<dyn HttpFetch>,
        clock: Arc<dyn Clock + Send + Sync>,
        currency_settings: CurrencyCacheSettings,
    ) -> Self {
        Self {
            tasks: TaskLifecycleService::new(repository, Arc::clone(&clock)),
            currency: CurrencyRateService::new(fetch, clock, currency_settings),
        }
    }
}

/// Builds the application router with request tracing.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/tasks", tasks::routes())
        .nest("/api/currency", currency::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
