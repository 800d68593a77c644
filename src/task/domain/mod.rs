//! Domain model for user task management.
//!
//! The task domain covers validated task content, the progress status state
//! machine, and the overdue rule applied by the background sweep, while
//! keeping all infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskDescription, TaskId, TaskTitle};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskContent};
