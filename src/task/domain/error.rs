//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the storage limit.
    #[error("task title is {length} characters long, limit is {max}")]
    TitleTooLong {
        /// Observed length in characters.
        length: usize,
        /// Accepted maximum.
        max: usize,
    },

    /// The task description exceeds the storage limit.
    #[error("task description is {length} characters long, limit is {max}")]
    DescriptionTooLong {
        /// Observed length in characters.
        length: usize,
        /// Accepted maximum.
        max: usize,
    },

    /// The due date is not strictly after the reference time.
    #[error("due date {due_date} must be in the future")]
    DueDateNotInFuture {
        /// Rejected due date.
        due_date: DateTime<Utc>,
    },

    /// The nil UUID was supplied as a task identifier.
    #[error("invalid task identifier: {0}")]
    NilTaskId(TaskId),

    /// Only pending and in-progress tasks can become overdue.
    #[error("task {task_id} cannot become overdue from status {status}")]
    CannotMarkOverdue {
        /// Task identifier.
        task_id: TaskId,
        /// Status the task was in.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from persistence or requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
