//! Shared helpers for `PostgreSQL` integration tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::WrapErr;
use taskhub::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{PersistedTaskData, Task, TaskId, TaskStatus, TaskTitle},
};
use tracing::warn;
use uuid::Uuid;

/// Environment variable naming the server used by these tests.
pub const DATABASE_URL_ENV: &str = "TASKHUB_TEST_DATABASE_URL";

/// Repository bound to a schema that is dropped with the guard.
pub struct TestDatabase {
    pub repository: PostgresTaskRepository,
    admin_url: String,
    schema: String,
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        let sql = format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", self.schema);
        let dropped = PgConnection::establish(&self.admin_url)
            .map_err(|err| err.to_string())
            .and_then(|mut connection| {
                connection.batch_execute(&sql).map_err(|err| err.to_string())
            });
        if let Err(err) = dropped {
            warn!(schema = %self.schema, error = %err, "failed to drop test schema");
        }
    }
}

/// Creates an isolated schema with the task table applied.
///
/// # Errors
///
/// Returns an error if no test server is configured, or if the schema or
/// connection pool cannot be created.
pub async fn setup() -> eyre::Result<TestDatabase> {
    let admin_url = std::env::var(DATABASE_URL_ENV)
        .wrap_err_with(|| format!("{DATABASE_URL_ENV} must name a PostgreSQL server"))?;
    let schema = format!("taskhub_test_{}", Uuid::new_v4().simple());

    let create_url = admin_url.clone();
    let create_sql = format!("CREATE SCHEMA \"{schema}\"");
    tokio::task::spawn_blocking(move || -> eyre::Result<()> {
        let mut connection =
            PgConnection::establish(&create_url).wrap_err("connect to test server")?;
        connection
            .batch_execute(&create_sql)
            .wrap_err("create test schema")?;
        Ok(())
    })
    .await
    .wrap_err("join schema setup")??;

    let separator = if admin_url.contains('?') { '&' } else { '?' };
    let scoped_url = format!("{admin_url}{separator}options=-csearch_path%3D{schema}");
    let pool = Pool::builder()
        .max_size(2)
        .build(ConnectionManager::<PgConnection>::new(scoped_url))
        .wrap_err("build test pool")?;
    let database = TestDatabase {
        repository: PostgresTaskRepository::new(pool),
        admin_url,
        schema,
    };
    database
        .repository
        .apply_schema()
        .await
        .wrap_err("apply task schema")?;
    Ok(database)
}

/// Fixed reference instant with whole-second precision.
#[must_use]
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Builds a stored-shape task due `due_in` after the reference time.
///
/// # Errors
///
/// Returns an error if the title is not a valid task title.
pub fn task(
    title: &str,
    status: TaskStatus,
    due_in: Option<Duration>,
) -> eyre::Result<Task> {
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: TaskTitle::new(title)?,
        description: None,
        due_date: due_in.map(|offset| reference_time() + offset),
        status,
    }))
}
