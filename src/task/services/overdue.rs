//! Periodic reclassification of elapsed tasks as overdue.

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryResult},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Timing and enablement for the overdue sweep loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdueSweepSettings {
    /// When `false` the loop exits immediately without touching the store.
    pub enabled: bool,
    /// Pause between successful sweeps.
    pub interval: Duration,
    /// Pause after a failed sweep before trying again.
    pub retry_delay: Duration,
}

impl OverdueSweepSettings {
    /// Interval used when none is configured.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);
    /// Retry delay used when none is configured.
    pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(300);

    /// Returns enabled settings with the given interval and the default
    /// retry delay.
    #[must_use]
    pub const fn every(interval: Duration) -> Self {
        Self {
            enabled: true,
            interval,
            retry_delay: Self::DEFAULT_RETRY_DELAY,
        }
    }

    /// Returns settings that never sweep.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::every(Self::DEFAULT_INTERVAL)
        }
    }

    /// Replaces the retry delay.
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }
}

impl Default for OverdueSweepSettings {
    fn default() -> Self {
        Self::every(Self::DEFAULT_INTERVAL)
    }
}

/// Background job that marks elapsed, unfinished tasks as overdue.
pub struct OverdueSweeper<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    repository: Arc<R>,
    clock: Arc<C>,
    settings: OverdueSweepSettings,
}

impl<R, C> OverdueSweeper<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    /// Creates a sweeper over the given store and clock.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, settings: OverdueSweepSettings) -> Self {
        Self {
            repository,
            clock,
            settings,
        }
    }

    /// Runs one sweep and returns the identifiers that were marked overdue.
    ///
    /// All changes are written in one batch. Nothing is written when no task
    /// qualifies.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the candidate query or the batch save.
    pub async fn sweep_once(&self) -> TaskRepositoryResult<Vec<TaskId>> {
        let now = self.clock.utc();
        let candidates = self.repository.find_overdue_candidates(now).await?;

        let mut marked = Vec::with_capacity(candidates.len());
        for mut task in candidates {
            if let Err(err) = task.mark_overdue() {
                warn!(task_id = %task.id(), error = %err, "skipping task during overdue sweep");
                continue;
            }
            info!(task_id = %task.id(), title = %task.title(), "task marked overdue");
            marked.push(task);
        }

        if marked.is_empty() {
            debug!("overdue sweep found no tasks");
            return Ok(Vec::new());
        }

        self.repository.save_all(&marked).await?;
        info!(count = marked.len(), "overdue sweep updated tasks");
        Ok(marked.iter().map(Task::id).collect())
    }

    /// Sweeps repeatedly until `cancel` fires.
    ///
    /// Successful sweeps are followed by the configured interval, failed ones
    /// by the retry delay. Failures are logged and never end the loop.
    pub async fn run(self, cancel: CancellationToken) {
        if !self.settings.enabled {
            info!("overdue sweep disabled");
            return;
        }
        info!(
            interval_secs = self.settings.interval.as_secs(),
            "overdue sweep started"
        );

        loop {
            let outcome = tokio::select! {
                () = cancel.cancelled() => break,
                outcome = self.sweep_once() => outcome,
            };

            let pause = match outcome {
                Ok(_) => self.settings.interval,
                Err(err) => {
                    error!(
                        error = %err,
                        retry_in_secs = self.settings.retry_delay.as_secs(),
                        "overdue sweep failed"
                    );
                    self.settings.retry_delay
                }
            };

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(pause) => {}
            }
        }

        info!("overdue sweep stopped");
    }
}
