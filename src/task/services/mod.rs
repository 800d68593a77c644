//! Application services for task management and the overdue sweep.

mod lifecycle;
mod overdue;

pub use lifecycle::{
    PageRequest, PagedTasks, TaskInput, TaskLifecycleService, TaskServiceError,
    TaskServiceResult,
};
pub use overdue::{OverdueSweepSettings, OverdueSweeper};
