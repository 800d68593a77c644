//! Task management endpoints.
//!
//! - List, page, and filter tasks
//! - Create, read, replace, and delete a task
//! - Overdue and upcoming-deadline listings

use super::{ApiError, AppState, SharedTaskService};
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    services::{PageRequest, PagedTasks, TaskInput},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Create task routes.
#[must_use]
pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/paged", get(list_paged))
        .route("/overdue", get(list_overdue))
        .route("/upcoming-deadlines", get(list_upcoming))
        .route("/status/:status", get(list_by_status))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

// ─────────────────────────────────────────────────────────────────────────────
// Request/Response Types
// ─────────────────────────────────────────────────────────────────────────────

const fn default_status() -> TaskStatus {
    TaskStatus::Pending
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    #[serde(default = "default_status")]
    status: TaskStatus,
}

/// Body of `PUT /api/tasks/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    id: Option<Uuid>,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
}

fn to_input(
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
) -> TaskInput {
    let mut input = TaskInput::new(title, status);
    if let Some(text) = description {
        input = input.with_description(text);
    }
    if let Some(due) = due_date {
        input = input.with_due_date(due);
    }
    input
}

/// Task as rendered to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    id: Uuid,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: TaskStatus,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id().into_inner(),
            title: task.title().as_str().to_owned(),
            description: task.description().map(|text| text.as_str().to_owned()),
            due_date: task.due_date(),
            status: task.status(),
        }
    }
}

/// One page of tasks as rendered to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse {
    items: Vec<TaskResponse>,
    total_count: u64,
    page: u32,
    page_size: u32,
}

impl From<PagedTasks> for PagedResponse {
    fn from(paged: PagedTasks) -> Self {
        Self {
            items: paged.items.into_iter().map(Into::into).collect(),
            total_count: paged.total_count,
            page: paged.page,
            page_size: paged.page_size,
        }
    }
}

/// Query string of `GET /api/tasks/paged`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedQuery {
    page: Option<i64>,
    page_size: Option<i64>,
    status: Option<String>,
}

/// Query string of `GET /api/tasks/upcoming-deadlines`.
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    hours: Option<i64>,
}

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw)
        .map(TaskId::from_uuid)
        .map_err(|_| ApiError::bad_request(format!("invalid task identifier: {raw}")))
}

fn parse_status(raw: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::try_from(raw).map_err(|err| ApiError::bad_request(err.to_string()))
}

fn render(tasks: Vec<Task>) -> Json<Vec<TaskResponse>> {
    Json(tasks.into_iter().map(Into::into).collect())
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/tasks - List all tasks.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    Ok(render(state.tasks.list_all().await?))
}

/// GET /api/tasks/paged - One page of tasks.
async fn list_paged(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PagedQuery>,
) -> Result<Json<PagedResponse>, ApiError> {
    let mut request = PageRequest::new(
        query.page.unwrap_or(1),
        query
            .page_size
            .unwrap_or(i64::from(PageRequest::DEFAULT_PAGE_SIZE)),
    );
    if let Some(raw) = query.status.as_deref() {
        request = request.with_status(parse_status(raw)?);
    }
    let paged = state.tasks.list_paged(request).await?;
    Ok(Json(paged.into()))
}

/// GET /api/tasks/status/:status - Tasks with one status.
async fn list_by_status(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let status = parse_status(&raw)?;
    Ok(render(state.tasks.list_by_status(status).await?))
}

/// GET /api/tasks/overdue - Elapsed tasks that are not completed.
async fn list_overdue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    Ok(render(state.tasks.list_overdue().await?))
}

/// GET /api/tasks/upcoming-deadlines - Tasks due within the next hours.
async fn list_upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let hours = query
        .hours
        .unwrap_or(SharedTaskService::DEFAULT_UPCOMING_HOURS);
    if hours < 0 {
        return Err(ApiError::bad_request("hours must not be negative"));
    }
    Ok(render(state.tasks.list_upcoming(hours).await?))
}

/// GET /api/tasks/:id - Task details.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.tasks.get(parse_id(&raw)?).await?;
    Ok(Json(task.into()))
}

/// POST /api/tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<Response, ApiError> {
    let input = to_input(body.title, body.description, body.due_date, body.status);
    let task = state.tasks.create(input).await?;
    let location = format!("/api/tasks/{}", task.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TaskResponse::from(task)),
    )
        .into_response())
}

/// PUT /api/tasks/:id - Replace a task.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw)?;
    if body.id.is_some_and(|body_id| body_id != id.into_inner()) {
        return Err(ApiError::bad_request("task identifier in path and body differ"));
    }
    let input = to_input(body.title, body.description, body.due_date, body.status);
    state.tasks.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/tasks/:id - Delete a task.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(raw): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete(parse_id(&raw)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
