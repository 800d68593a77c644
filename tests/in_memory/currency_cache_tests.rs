//! In-memory integration tests for currency rate caching.

use std::sync::Arc;

use chrono::Duration;
use rstest::{fixture, rstest};
use taskhub::currency::{
    adapters::memory::InMemoryHttpFetch,
    services::{CurrencyCacheSettings, CurrencyRateService, CurrencyServiceError},
};

use crate::test_helpers::{ManualClock, SAMPLE_DOCUMENT};

struct Context {
    service: CurrencyRateService<InMemoryHttpFetch, ManualClock>,
    fetch: Arc<InMemoryHttpFetch>,
    clock: Arc<ManualClock>,
}

#[fixture]
fn context() -> Context {
    let fetch = Arc::new(InMemoryHttpFetch::new());
    let clock = Arc::new(ManualClock::fixed());
    Context {
        service: CurrencyRateService::new(
            Arc::clone(&fetch),
            Arc::clone(&clock),
            CurrencyCacheSettings::default(),
        ),
        fetch,
        clock,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_settings_target_the_daily_rates_endpoint(
    context: Context,
) -> Result<(), eyre::Report> {
    context.fetch.push_response(200, SAMPLE_DOCUMENT);

    context.service.get_all().await?;

    eyre::ensure!(
        context.fetch.requests() == vec!["https://www.cbr-xml-daily.ru/daily_json.js".to_owned()],
        "unexpected upstream URL"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_and_single_lookups_share_one_fetch(context: Context) -> Result<(), eyre::Report> {
    context.fetch.push_response(200, SAMPLE_DOCUMENT);

    let document = context.service.get_all().await?;
    let usd = context.service.get_one("usd").await?;
    let amd = context.service.get_one("AMD").await?;

    eyre::ensure!(document.len() == 3, "expected three currencies");
    eyre::ensure!(usd.char_code == "USD", "wrong USD entry");
    eyre::ensure!(amd.nominal == 100, "AMD nominal lost");
    eyre::ensure!(context.fetch.call_count() == 1, "expected a single fetch");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failure_then_recovery_after_expiry(context: Context) -> Result<(), eyre::Report> {
    context.fetch.push_response(200, SAMPLE_DOCUMENT);
    context.fetch.push_response(503, "maintenance");
    context.fetch.push_response(200, SAMPLE_DOCUMENT);

    context.service.get_one("EUR").await?;
    context.clock.advance(Duration::minutes(5));

    let failed = context.service.get_one("EUR").await;
    eyre::ensure!(
        matches!(failed, Err(CurrencyServiceError::Fetch(_))),
        "expected a fetch failure, got {failed:?}"
    );

    let recovered = context.service.get_one("EUR").await?;
    eyre::ensure!(recovered.id == "R01239", "wrong EUR entry");
    eyre::ensure!(context.fetch.call_count() == 3, "expected three fetches");
    Ok(())
}
