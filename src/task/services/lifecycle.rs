//! Service layer for task creation, retrieval, update, and deletion.

use crate::error::ErrorKind;
use crate::task::{
    domain::{Task, TaskContent, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskQuery, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating or fully replacing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
}

impl TaskInput {
    /// Creates a request with the required title and status.
    #[must_use]
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            status,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    fn into_content(self) -> Result<TaskContent, TaskDomainError> {
        let mut content = TaskContent::new(self.title, self.status)?;
        if let Some(description) = self.description {
            content = content.with_description(description)?;
        }
        if let Some(due_date) = self.due_date {
            content = content.with_due_date(due_date);
        }
        Ok(content)
    }
}

/// Raw paging parameters as received from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
    status: Option<TaskStatus>,
}

impl PageRequest {
    /// Page size used when the requested size is below one.
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Largest page size served.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Creates a request for the given one-based page and size.
    #[must_use]
    pub const fn new(page: i64, page_size: i64) -> Self {
        Self {
            page,
            page_size,
            status: None,
        }
    }

    /// Restricts the listing to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Clamps the request: pages start at 1, sizes below 1 fall back to the
    /// default, and sizes above the maximum are capped.
    #[must_use]
    pub fn to_query(self) -> TaskQuery {
        let page = u32::try_from(self.page.max(1)).unwrap_or(u32::MAX);
        let page_size = if self.page_size < 1 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            u32::try_from(self.page_size)
                .unwrap_or(Self::MAX_PAGE_SIZE)
                .min(Self::MAX_PAGE_SIZE)
        };
        TaskQuery {
            page,
            page_size,
            status: self.status,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, i64::from(Self::DEFAULT_PAGE_SIZE))
    }
}

/// One page of tasks together with the effective paging parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedTasks {
    /// Tasks on this page.
    pub items: Vec<Task>,
    /// Number of tasks matching the filter across all pages.
    pub total_count: u64,
    /// Effective one-based page index.
    pub page: u32,
    /// Effective page size.
    pub page_size: u32,
}

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The task is in progress and cannot be deleted.
    #[error("task {0} is in progress and cannot be deleted")]
    DeleteInProgress(TaskId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::DeleteInProgress(_) | Self::Repository(TaskRepositoryError::DuplicateTask(_)) => {
                ErrorKind::Conflict
            }
            Self::Repository(TaskRepositoryError::Persistence(_)) => ErrorKind::Infrastructure,
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task management orchestration service.
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    /// Default look-ahead window for [`Self::list_upcoming`], in hours.
    pub const DEFAULT_UPCOMING_HOURS: i64 = 24;

    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    async fn find_or_error(&self, id: TaskId) -> TaskServiceResult<Task> {
        ensure_not_nil(id)?;
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TaskServiceError::NotFound(id))
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the title is blank or too
    /// long, the description is too long, or the due date is not in the
    /// future; repository errors otherwise.
    pub async fn create(&self, input: TaskInput) -> TaskServiceResult<Task> {
        let content = input.into_content()?;
        let task = Task::create(content, &*self.clock)?;
        self.repository.store(&task).await?;
        info!(task_id = %task.id(), status = %task.status(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for the nil identifier and
    /// [`TaskServiceError::NotFound`] when no task matches.
    pub async fn get(&self, id: TaskId) -> TaskServiceResult<Task> {
        debug!(task_id = %id, "fetching task");
        let task = self.find_or_error(id).await.inspect_err(|err| {
            warn!(task_id = %id, error = %err, "task lookup failed");
        })?;
        Ok(task)
    }

    /// Replaces the title, description, due date, and status of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] for invalid input or the nil
    /// identifier, [`TaskServiceError::NotFound`] when no task matches, and
    /// repository errors otherwise.
    pub async fn update(&self, id: TaskId, input: TaskInput) -> TaskServiceResult<Task> {
        let content = input.into_content()?;
        let mut task = self.find_or_error(id).await?;
        task.replace_content(content, &*self.clock)?;
        self.repository.update(&task).await?;
        info!(task_id = %id, status = %task.status(), "task updated");
        Ok(task)
    }

    /// Deletes a task unless it is in progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::DeleteInProgress`] for in-progress tasks,
    /// [`TaskServiceError::NotFound`] when no task matches, and
    /// [`TaskServiceError::Domain`] for the nil identifier.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<()> {
        let task = self.find_or_error(id).await?;
        if !task.can_be_deleted() {
            return Err(TaskServiceError::DeleteInProgress(id));
        }
        self.repository.delete(id).await?;
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Returns one page of tasks ordered by due date.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_paged(&self, request: PageRequest) -> TaskServiceResult<PagedTasks> {
        let query = request.to_query();
        let page = self.repository.list_page(query).await?;
        Ok(PagedTasks {
            items: page.items,
            total_count: page.total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }

    /// Returns every task.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_all(&self) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns every task with the given status.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_by_status(&self, status: TaskStatus) -> TaskServiceResult<Vec<Task>> {
        self.list_matching(|task| task.status() == status).await
    }

    /// Returns tasks whose due date has passed and that are not completed,
    /// whether or not the sweep has reclassified them yet.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_overdue(&self) -> TaskServiceResult<Vec<Task>> {
        let now = self.clock.utc();
        self.list_matching(|task| {
            task.status() != TaskStatus::Completed && task.due_date().is_some_and(|due| due < now)
        })
        .await
    }

    /// Returns incomplete tasks due within the next `hours` hours.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn list_upcoming(&self, hours: i64) -> TaskServiceResult<Vec<Task>> {
        let now = self.clock.utc();
        let horizon = Duration::try_hours(hours)
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.list_matching(|task| {
            task.status() != TaskStatus::Completed
                && task.due_date().is_some_and(|due| due > now && due <= horizon)
        })
        .await
    }

    async fn list_matching(
        &self,
        predicate: impl Fn(&Task) -> bool + Send,
    ) -> TaskServiceResult<Vec<Task>> {
        let tasks = self.repository.list_all().await?;
        Ok(tasks.into_iter().filter(|task| predicate(task)).collect())
    }
}

const fn ensure_not_nil(id: TaskId) -> Result<(), TaskDomainError> {
    if id.is_nil() {
        return Err(TaskDomainError::NilTaskId(id));
    }
    Ok(())
}
