use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::application::task_service::TaskService;
use crate::domain::task::{CreateTask, Task, TaskId, UpdateTask};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct AppState<S: TaskService> { pub service: S }

pub fn router<S: TaskService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todos", post(create_task::<S>).get(list_tasks::<S>))
        .route("/todos/:id", get(get_task::<S>).put(update_task::<S>).delete(delete_task::<S>))
        .with_state(state)
}

async fn create_task<S: TaskService>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateTask>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(payload) = payload?;
    let task = state.service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_tasks<S: TaskService>(State(state): State<AppState<S>>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.service.find_all().await?))
}

async fn get_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId(id);
    match state.service.find_one(&id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(id.as_str())),
    }
}

async fn update_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTask>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(payload) = payload?;
    let id = TaskId(id);
    match state.service.update(&id, payload).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(id.as_str())),
    }
}

async fn delete_task<S: TaskService>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TaskId(id);
    if state.service.remove(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(id.as_str()))
    }
}
