//! In-memory integration tests for task lifecycle operations.

use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use rstest::{fixture, rstest};
use taskhub::error::ErrorKind;
use taskhub::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskStatus},
    ports::TaskRepository,
    services::{PageRequest, TaskInput, TaskLifecycleService},
};

use crate::test_helpers::ManualClock;

type TestService = TaskLifecycleService<InMemoryTaskRepository, ManualClock>;

struct Context {
    service: TestService,
    repository: Arc<InMemoryTaskRepository>,
    clock: Arc<ManualClock>,
}

#[fixture]
fn context() -> Context {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let clock = Arc::new(ManualClock::fixed());
    Context {
        service: TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock)),
        repository,
        clock,
    }
}

fn ids(tasks: &[Task]) -> Vec<taskhub::task::domain::TaskId> {
    tasks.iter().map(Task::id).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_moves_from_pending_to_completed(context: Context) -> Result<(), eyre::Report> {
    let due = context.clock.utc() + Duration::days(1);
    let created = context
        .service
        .create(TaskInput::new("Renew certificate", TaskStatus::Pending).with_due_date(due))
        .await?;

    context
        .service
        .update(
            created.id(),
            TaskInput::new("Renew certificate", TaskStatus::InProgress).with_due_date(due),
        )
        .await?;
    let completed = context
        .service
        .update(
            created.id(),
            TaskInput::new("Renew certificate", TaskStatus::Completed).with_due_date(due),
        )
        .await?;

    eyre::ensure!(completed.status() == TaskStatus::Completed, "task not completed");
    eyre::ensure!(completed.due_date() == Some(due), "due date changed");
    let stored = context
        .repository
        .find_by_id(created.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task missing from repository"))?;
    eyre::ensure!(stored == completed, "repository holds a stale copy");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn in_progress_task_becomes_deletable_once_completed(
    context: Context,
) -> Result<(), eyre::Report> {
    let created = context
        .service
        .create(TaskInput::new("Migrate data", TaskStatus::InProgress))
        .await?;

    let refused = context.service.delete(created.id()).await;
    eyre::ensure!(
        refused.as_ref().map_err(|err| err.kind()) == Err(ErrorKind::Conflict),
        "expected a conflict, got {refused:?}"
    );

    context
        .service
        .update(
            created.id(),
            TaskInput::new("Migrate data", TaskStatus::Completed),
        )
        .await?;
    context.service.delete(created.id()).await?;

    eyre::ensure!(
        context.repository.find_by_id(created.id()).await?.is_none(),
        "task should be gone"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paging_walks_every_task_exactly_once(context: Context) -> Result<(), eyre::Report> {
    let mut created = Vec::new();
    for hour in 1..=7 {
        let task = context
            .service
            .create(
                TaskInput::new(format!("Task {hour}"), TaskStatus::Pending)
                    .with_due_date(context.clock.utc() + Duration::hours(hour)),
            )
            .await?;
        created.push(task);
    }

    let mut seen = Vec::new();
    for page in 1..=3 {
        let result = context
            .service
            .list_paged(PageRequest::new(page, 3))
            .await?;
        eyre::ensure!(result.total_count == 7, "unexpected total {}", result.total_count);
        seen.extend(result.items);
    }

    eyre::ensure!(ids(&seen) == ids(&created), "pages out of due-date order");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn oversized_page_request_is_capped(context: Context) -> Result<(), eyre::Report> {
    for index in 0..3 {
        context
            .service
            .create(TaskInput::new(format!("Task {index}"), TaskStatus::Pending))
            .await?;
    }

    let page = context
        .service
        .list_paged(PageRequest::new(0, 10_000))
        .await?;

    eyre::ensure!(page.page == 1, "page not clamped");
    eyre::ensure!(page.page_size == 100, "page size not capped");
    eyre::ensure!(page.items.len() == 3, "expected every task on one page");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn save_all_skips_tasks_deleted_after_read(context: Context) -> Result<(), eyre::Report> {
    let due = context.clock.utc() + Duration::minutes(10);
    let kept = context
        .service
        .create(TaskInput::new("Kept", TaskStatus::Pending).with_due_date(due))
        .await?;
    let removed = context
        .service
        .create(TaskInput::new("Removed", TaskStatus::Pending).with_due_date(due))
        .await?;
    context.clock.advance(Duration::minutes(20));

    let mut candidates = context
        .repository
        .find_overdue_candidates(context.clock.utc())
        .await?;
    context.repository.delete(removed.id()).await?;
    for task in &mut candidates {
        task.mark_overdue()?;
    }
    context.repository.save_all(&candidates).await?;

    let all = context.repository.list_all().await?;
    eyre::ensure!(ids(&all) == vec![kept.id()], "deleted task reappeared");
    eyre::ensure!(
        all.iter().all(|task| task.status() == TaskStatus::Overdue),
        "remaining task not marked"
    );
    Ok(())
}
