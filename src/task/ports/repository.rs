//! Repository port for task persistence, lookup, and overdue sweeps.

use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter and window for a paginated task listing.
///
/// `page` is one-based. Callers are expected to have clamped both values to
/// sensible ranges before reaching the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskQuery {
    /// One-based page index.
    pub page: u32,
    /// Maximum number of tasks per page.
    pub page_size: u32,
    /// Optional status filter.
    pub status: Option<TaskStatus>,
}

impl TaskQuery {
    /// Number of rows to skip before the requested page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * (self.page_size as u64)
    }
}

/// One page of tasks plus the size of the unpaginated result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on the requested page, ordered by due date with undated tasks
    /// last.
    pub items: Vec<Task>,
    /// Number of tasks matching the filter across all pages.
    pub total_count: u64,
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Replaces every stored field of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every stored task.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns one page of tasks matching the query.
    async fn list_page(&self, query: TaskQuery) -> TaskRepositoryResult<TaskPage>;

    /// Returns tasks that have a due date strictly before `now` and whose
    /// status is neither completed nor overdue.
    async fn find_overdue_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists the status of every given task in one atomic batch.
    ///
    /// Only the status column is written. Tasks deleted since they were read
    /// and rows that have meanwhile become completed or overdue are skipped.
    /// Either every remaining row is updated or none is.
    async fn save_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
