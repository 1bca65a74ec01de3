use super::record_id;
use crate::auth::Owner;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_auth::IdentityProvider;
use daybook_domain::summary::{sort_newest_first, StatusFilter, TaskFilter};
use daybook_domain::{summarize_today, tasks_per_weekday, Task, TaskSummary};
use daybook_store::{Collection, RecordStore, TaskPatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: StatusFilter,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// Task Aggregator output plus the weekly activity counts the home screen
/// charts.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: TaskSummary,
    pub week: [usize; 7],
}

pub async fn list<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let mut tasks = state.store.list_tasks(&owner).await?;
    sort_newest_first(&mut tasks);
    let filter = TaskFilter {
        status: query.status,
        search: query.search,
    };
    Ok(Json(filter.apply(tasks)))
}

pub async fn create<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = Task::new(req.title, owner.clone())?;
    state.store.put_task(&task).await?;
    state.feed.publish(&owner, Collection::Tasks);

    tracing::info!(task_id = task.id.as_str(), owner = owner.as_str(), "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    if req.title.is_none() && req.completed.is_none() {
        return Err(ApiError::BadRequest(
            "At least one of 'title' or 'completed' is required".to_string(),
        ));
    }
    if let Some(title) = req.title.as_deref() {
        Task::validate_title(title)?;
    }

    let id = record_id(&id)?;
    let patch = TaskPatch {
        title: req.title.map(|t| t.trim().to_string()),
        completed: req.completed,
    };
    let task = state.store.update_task(&owner, &id, patch).await?;
    state.feed.publish(&owner, Collection::Tasks);
    Ok(Json(task))
}

pub async fn delete<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = record_id(&id)?;
    state.store.delete_task(&owner, &id).await?;
    state.feed.publish(&owner, Collection::Tasks);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary<S: RecordStore, P: IdentityProvider>(
    State(state): State<AppState<S, P>>,
    Owner(owner): Owner,
) -> Result<Json<SummaryResponse>, ApiError> {
    let tasks = state.store.list_tasks(&owner).await?;
    let today = chrono::Local::now().date_naive();
    Ok(Json(SummaryResponse {
        summary: summarize_today(&tasks),
        week: tasks_per_weekday(&tasks, today),
    }))
}
