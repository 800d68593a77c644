//! Task aggregate root and its validated content.

use super::{TaskDescription, TaskDomainError, TaskId, TaskStatus, TaskTitle};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// User-editable fields of a task, already validated.
///
/// Creation and update both replace the full content; the due-date rule that
/// depends on the current time is checked by [`Task`] itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContent {
    title: TaskTitle,
    description: Option<TaskDescription>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
}

impl TaskContent {
    /// Creates content with the required title and status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] or
    /// [`TaskDomainError::TitleTooLong`] for an invalid title.
    pub fn new(title: impl Into<String>, status: TaskStatus) -> Result<Self, TaskDomainError> {
        Ok(Self {
            title: TaskTitle::new(title)?,
            description: None,
            due_date: None,
            status,
        })
    }

    /// Sets the description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DescriptionTooLong`] when the description
    /// exceeds the length limit.
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        self.description = Some(TaskDescription::new(description)?);
        Ok(self)
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the requested status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<TaskDescription>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted status.
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new task from validated content.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DueDateNotInFuture`] when a due date is set
    /// and is not strictly after the clock's current time.
    pub fn create(
        content: TaskContent,
        clock: &(impl Clock + ?Sized),
    ) -> Result<Self, TaskDomainError> {
        if let Some(due_date) = content.due_date {
            ensure_future(due_date, clock.utc())?;
        }

        Ok(Self {
            id: TaskId::new(),
            title: content.title,
            description: content.description,
            due_date: content.due_date,
            status: content.status,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            status: data.status,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Replaces every user-editable field.
    ///
    /// A supplied due date must lie in the future. Completing a task without
    /// a due date stamps the completion time as its due date, which is how an
    /// overdue task gets completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DueDateNotInFuture`] when the due date is not
    /// strictly after the clock's current time.
    pub fn replace_content(
        &mut self,
        content: TaskContent,
        clock: &(impl Clock + ?Sized),
    ) -> Result<(), TaskDomainError> {
        let now = clock.utc();
        let due_date = match content.due_date {
            Some(requested) => {
                ensure_future(requested, now)?;
                Some(requested)
            }
            None if content.status == TaskStatus::Completed => Some(now),
            None => None,
        };

        self.title = content.title;
        self.description = content.description;
        self.due_date = due_date;
        self.status = content.status;
        Ok(())
    }

    /// Returns `true` when the overdue sweep should reclassify this task at
    /// `now`: a due date is set, it lies strictly before `now`, and the status
    /// is not terminal for the sweep.
    #[must_use]
    pub fn is_overdue_candidate(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_sweep_terminal() && self.due_date.is_some_and(|due| due < now)
    }

    /// Transitions a pending or in-progress task to
    /// [`TaskStatus::Overdue`]. No other field changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CannotMarkOverdue`] when the task is already
    /// completed or overdue.
    pub fn mark_overdue(&mut self) -> Result<(), TaskDomainError> {
        if self.status.is_sweep_terminal() {
            return Err(TaskDomainError::CannotMarkOverdue {
                task_id: self.id,
                status: self.status,
            });
        }
        self.status = TaskStatus::Overdue;
        Ok(())
    }

    /// Returns `true` unless the task is in progress.
    #[must_use]
    pub fn can_be_deleted(&self) -> bool {
        self.status != TaskStatus::InProgress
    }
}

fn ensure_future(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), TaskDomainError> {
    if due_date <= now {
        return Err(TaskDomainError::DueDateNotInFuture { due_date });
    }
    Ok(())
}
