//! In-memory integration tests for the overdue sweep.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};
use taskhub::error::ErrorKind;
use taskhub::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::TaskStatus,
    ports::TaskRepository,
    services::{OverdueSweepSettings, OverdueSweeper, TaskInput, TaskLifecycleService},
};
use tokio_util::sync::CancellationToken;

use crate::test_helpers::ManualClock;

struct Context {
    service: TaskLifecycleService<InMemoryTaskRepository, ManualClock>,
    sweeper: OverdueSweeper<InMemoryTaskRepository, ManualClock>,
    clock: Arc<ManualClock>,
}

#[fixture]
fn context() -> Context {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(ManualClock::fixed());
    Context {
        service: TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
        sweeper: OverdueSweeper::new(
            repository,
            Arc::clone(&clock),
            OverdueSweepSettings::default(),
        ),
        clock,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_becomes_overdue_only_after_its_due_date(
    context: Context,
) -> Result<(), eyre::Report> {
    let task = context
        .service
        .create(
            TaskInput::new("Submit expenses", TaskStatus::Pending)
                .with_due_date(context.clock.utc() + Duration::hours(1)),
        )
        .await?;

    let marked = context.sweeper.sweep_once().await?;
    eyre::ensure!(marked.is_empty(), "task swept before its due date");
    eyre::ensure!(
        context.service.get(task.id()).await?.status() == TaskStatus::Pending,
        "status changed early"
    );

    context.clock.advance(Duration::hours(2));
    let marked = context.sweeper.sweep_once().await?;

    eyre::ensure!(marked == vec![task.id()], "expected the task to be marked");
    let swept = context.service.get(task.id()).await?;
    eyre::ensure!(swept.status() == TaskStatus::Overdue, "task not overdue");
    eyre::ensure!(swept.title() == task.title(), "title changed");
    eyre::ensure!(swept.due_date() == task.due_date(), "due date changed");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_sweeps_are_idempotent(context: Context) -> Result<(), eyre::Report> {
    context
        .service
        .create(
            TaskInput::new("Book venue", TaskStatus::InProgress)
                .with_due_date(context.clock.utc() + Duration::minutes(5)),
        )
        .await?;
    context.clock.advance(Duration::minutes(6));

    let first = context.sweeper.sweep_once().await?;
    let second = context.sweeper.sweep_once().await?;

    eyre::ensure!(first.len() == 1, "first sweep should mark one task");
    eyre::ensure!(second.is_empty(), "second sweep should find nothing");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_task_can_still_be_completed(context: Context) -> Result<(), eyre::Report> {
    let due = context.clock.utc() + Duration::minutes(30);
    let task = context
        .service
        .create(TaskInput::new("File taxes", TaskStatus::Pending).with_due_date(due))
        .await?;
    context.clock.advance(Duration::hours(1));
    context.sweeper.sweep_once().await?;

    let completed = context
        .service
        .update(
            task.id(),
            TaskInput::new("File taxes", TaskStatus::Completed),
        )
        .await?;
    let resubmitted = context
        .service
        .update(
            task.id(),
            TaskInput::new("File taxes", TaskStatus::Completed).with_due_date(due),
        )
        .await;
    context.clock.advance(Duration::hours(1));
    let marked = context.sweeper.sweep_once().await?;

    eyre::ensure!(completed.status() == TaskStatus::Completed, "not completed");
    eyre::ensure!(
        resubmitted.as_ref().map_err(|err| err.kind()) == Err(ErrorKind::Validation),
        "elapsed due date accepted on update: {resubmitted:?}"
    );
    eyre::ensure!(marked.is_empty(), "completed task was swept again");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_between_read_and_batch_write_is_kept() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(ManualClock::fixed());
    let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
    let task = service
        .create(
            TaskInput::new("Pay invoice", TaskStatus::Pending)
                .with_due_date(clock.utc() + Duration::hours(1)),
        )
        .await?;
    clock.advance(Duration::hours(2));

    let mut candidates = repository.find_overdue_candidates(clock.utc()).await?;
    service
        .update(task.id(), TaskInput::new("Pay invoice", TaskStatus::Completed))
        .await?;
    for candidate in &mut candidates {
        candidate.mark_overdue()?;
    }
    repository.save_all(&candidates).await?;

    let stored = service.get(task.id()).await?;
    eyre::ensure!(candidates.len() == 1, "expected one candidate");
    eyre::ensure!(
        stored.status() == TaskStatus::Completed,
        "batch write reverted a completed task to {}",
        stored.status()
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn background_loop_marks_task_within_one_interval() -> Result<(), eyre::Report> {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(ManualClock::fixed());
    let service = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
    let task = service
        .create(
            TaskInput::new("Water plants", TaskStatus::Pending)
                .with_due_date(clock.utc() + Duration::seconds(30)),
        )
        .await?;
    let sweeper = OverdueSweeper::new(
        repository,
        Arc::clone(&clock),
        OverdueSweepSettings::every(StdDuration::from_secs(60)),
    );
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(sweeper.run(cancel.clone()));

    tokio::time::sleep(StdDuration::from_secs(1)).await;
    eyre::ensure!(
        service.get(task.id()).await?.status() == TaskStatus::Pending,
        "task swept before it was due"
    );

    clock.advance(Duration::seconds(31));
    tokio::time::sleep(StdDuration::from_secs(60)).await;

    eyre::ensure!(
        service.get(task.id()).await?.status() == TaskStatus::Overdue,
        "task not swept within one interval"
    );
    cancel.cancel();
    handle.await?;
    Ok(())
}
