//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::user_tasks,
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskDescription, TaskId, TaskStatus, TaskTitle},
    ports::{TaskPage, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent DDL creating the `user_tasks` table and its indexes.
pub const USER_TASKS_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_user_tasks/up.sql");

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Creates the task table and indexes when they do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when a connection cannot
    /// be checked out or the DDL fails.
    pub async fn apply_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(USER_TASKS_SCHEMA_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(user_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);

        self.run_blocking(move |connection| {
            let affected = diesel::update(user_tasks::table.find(task_id.into_inner()))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(user_tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = user_tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = user_tasks::table
                .select(TaskRow::as_select())
                .order((user_tasks::due_date.asc().nulls_last(), user_tasks::id.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_page(&self, query: TaskQuery) -> TaskRepositoryResult<TaskPage> {
        let offset = i64::try_from(query.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = i64::from(query.page_size);

        self.run_blocking(move |connection| {
            let total = filtered_by_status(query.status)
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            let rows = filtered_by_status(query.status)
                .select(TaskRow::as_select())
                .order((user_tasks::due_date.asc().nulls_last(), user_tasks::id.asc()))
                .offset(offset)
                .limit(limit)
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;

            let items = rows
                .into_iter()
                .map(row_to_task)
                .collect::<TaskRepositoryResult<Vec<_>>>()?;
            let total_count = u64::try_from(total).map_err(TaskRepositoryError::persistence)?;
            Ok(TaskPage { items, total_count })
        })
        .await
    }

    async fn find_overdue_candidates(
        &self,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = user_tasks::table
                .filter(user_tasks::due_date.is_not_null())
                .filter(user_tasks::due_date.lt(now))
                .filter(user_tasks::status.ne(TaskStatus::Completed.as_str()))
                .filter(user_tasks::status.ne(TaskStatus::Overdue.as_str()))
                .select(TaskRow::as_select())
                .order(user_tasks::due_date.asc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn save_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        if tasks.is_empty() {
            return Ok(());
        }
        let updates: Vec<(uuid::Uuid, &'static str)> = tasks
            .iter()
            .map(|task| (task.id().into_inner(), task.status().as_str()))
            .collect();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|transaction| {
                    for (id, status) in &updates {
                        diesel::update(
                            user_tasks::table
                                .find(*id)
                                .filter(user_tasks::status.ne(TaskStatus::Completed.as_str()))
                                .filter(user_tasks::status.ne(TaskStatus::Overdue.as_str())),
                        )
                        .set(user_tasks::status.eq(*status))
                        .execute(transaction)?;
                    }
                    Ok(())
                })
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn filtered_by_status(status: Option<TaskStatus>) -> user_tasks::BoxedQuery<'static, Pg> {
    let query = user_tasks::table.into_boxed();
    match status {
        Some(wanted) => query.filter(user_tasks::status.eq(wanted.as_str())),
        None => query,
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(|value| value.as_str().to_owned()),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().as_str().to_owned(),
        description: task.description().map(|value| value.as_str().to_owned()),
        due_date: task.due_date(),
        status: task.status().as_str().to_owned(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description: persisted_description,
        due_date,
        status: persisted_status,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let description = persisted_description
        .map(TaskDescription::new)
        .transpose()
        .map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        due_date,
        status,
    }))
}
