//! Unit tests for the task module.


use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

mock! {
    pub TaskRepo {}

    #[async_trait]
    impl TaskRepository for TaskRepo {
        async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;
        async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;
        async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
        async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
        async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;
        async fn list_page(&self, query: TaskQuery) -> TaskRepositoryResult<TaskPage>;
        async fn find_overdue_candidates(
            &self,
            now: DateTime<Utc>,
        ) -> TaskRepositoryResult<Vec<Task>>;
        async fn save_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;
    }
}
