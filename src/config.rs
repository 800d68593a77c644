//! Server configuration from command-line flags and environment variables.

use crate::currency::services::{CurrencyCacheSettings, DEFAULT_RATES_URL};
use crate::task::services::OverdueSweepSettings;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

const SECONDS_PER_MINUTE: u64 = 60;

/// Task hub server.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "taskhub", about = "Task management server with overdue sweep")]
pub struct Config {
    /// Address the HTTP server binds to.
    #[arg(long, env = "TASKHUB_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKHUB_DATABASE_POOL_SIZE", default_value_t = 8)]
    pub database_pool_size: u32,

    /// Whether the overdue sweep runs.
    #[arg(
        long,
        env = "OVERDUE_TASK_CHECK_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub overdue_check_enabled: bool,

    /// Minutes between overdue sweeps.
    #[arg(
        long,
        env = "OVERDUE_TASK_CHECK_INTERVAL_MINUTES",
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub overdue_check_interval_minutes: u64,

    /// Minutes to wait after a failed sweep.
    #[arg(
        long,
        env = "OVERDUE_TASK_RETRY_DELAY_MINUTES",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub overdue_retry_delay_minutes: u64,

    /// URL of the daily currency rate document.
    #[arg(long, env = "CURRENCY_RATES_URL", default_value = DEFAULT_RATES_URL)]
    pub currency_rates_url: String,

    /// Seconds a fetched rate document stays cached.
    #[arg(long, env = "CURRENCY_CACHE_TTL_SECS", default_value_t = 300)]
    pub currency_cache_ttl_secs: u64,

    /// Timeout for outbound HTTP requests, in seconds.
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,
}

impl Config {
    /// Timing for the overdue sweep loop.
    #[must_use]
    pub const fn sweep_settings(&self) -> OverdueSweepSettings {
        OverdueSweepSettings {
            enabled: self.overdue_check_enabled,
            interval: minutes(self.overdue_check_interval_minutes),
            retry_delay: minutes(self.overdue_retry_delay_minutes),
        }
    }

    /// Upstream location and lifetime for cached currency rates.
    #[must_use]
    pub fn currency_settings(&self) -> CurrencyCacheSettings {
        CurrencyCacheSettings::new(self.currency_rates_url.clone())
            .with_ttl(Duration::from_secs(self.currency_cache_ttl_secs))
    }

    /// Whole-request timeout for outbound HTTP calls.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

const fn minutes(count: u64) -> Duration {
    Duration::from_secs(count.saturating_mul(SECONDS_PER_MINUTE))
}
