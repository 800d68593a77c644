//! In-memory repository for task management tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<TaskId, Task>>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<TaskId, Task>>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Orders by due date ascending with undated tasks last, then by identifier
/// so that pages are stable.
fn due_date_order(left: &Task, right: &Task) -> Ordering {
    match (left.due_date(), right.due_date()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| left.id().cmp(&right.id()))
}

/// Copies `stored` with only its status replaced.
fn with_status(stored: &Task, status: TaskStatus) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: stored.id(),
        title: stored.title().clone(),
        description: stored.description().cloned(),
        due_date: stored.due_date(),
        status,
    })
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .get_mut(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut tasks: Vec<Task> = state.values().cloned().collect();
        tasks.sort_by(due_date_order);
        Ok(tasks)
    }

    async fn list_page(&self, query: TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let state = self.read()?;
        let mut matching: Vec<&Task> = state
            .values()
            .filter(|task| query.status.is_none_or(|status| task.status() == status))
            .collect();
        matching.sort_by(|left, right| due_date_order(left, right));

        let skip = usize::try_from(query.offset()).map_err(TaskRepositoryError::persistence)?;
        let take = usize::try_from(query.page_size).map_err(TaskRepositoryError::persistence)?;
        let total_count = u64::try_from(matching.len()).map_err(TaskRepositoryError::persistence)?;
        let items = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        Ok(TaskPage { items, total_count })
    }

    async fn find_overdue_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        let mut candidates: Vec<Task> = state
            .values()
            .filter(|task| task.is_overdue_candidate(now))
            .cloned()
            .collect();
        candidates.sort_by(due_date_order);
        Ok(candidates)
    }

    async fn save_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        // A single write guard makes the batch atomic with respect to readers.
        let mut state = self.write()?;
        for task in tasks {
            let open = state
                .get_mut(&task.id())
                .filter(|stored| !stored.status().is_sweep_terminal());
            if let Some(stored) = open {
                *stored = with_status(stored, task.status());
            }
        }
        Ok(())
    }
}
