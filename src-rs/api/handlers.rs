use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::error::ApiError;
use crate::api::server::AppState;
use crate::task::{NewTask, Task, TaskStatus};

#[derive(Debug, Deserialize, Default)]
pub struct TasksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CreateTaskRequest {
    pub transcript: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UpdateStatusResponse {
    pub id: i64,
    pub status: TaskStatus,
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let status = query.status.filter(|status| !status.is_empty());
    let tasks = tokio::task::spawn_blocking(move || state.store.list(status.as_deref())).await??;
    Ok(Json(tasks))
}

pub async fn handle_create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    // A missing, non-JSON or mistyped body is the same client error as a blank transcript.
    let transcript = match payload {
        Ok(Json(CreateTaskRequest {
            transcript: Some(transcript),
        })) if !transcript.trim().is_empty() => transcript,
        Ok(_) => return Err(ApiError::BadRequest("Transcript is required".to_string())),
        Err(rejection) => {
            debug!(error = %rejection, "unreadable create body");
            return Err(ApiError::BadRequest("Transcript is required".to_string()));
        }
    };

    let worker = state.clone();
    let task = tokio::task::spawn_blocking(move || {
        let extracted = worker.extractor.extract(&transcript, Utc::now());
        worker
            .store
            .create(&NewTask::from_extraction(extracted, &transcript))
    })
    .await??;
    info!(
        task_id = task.id,
        title = %task.title,
        priority = task.priority.as_str(),
        "task created"
    );

    // Not awaited: the response never waits on mail delivery.
    let notifier = state.notifier.clone();
    let created = task.clone();
    tokio::task::spawn_blocking(move || {
        if let Err(err) = notifier.notify(&created) {
            warn!(task_id = created.id, error = %err, "task notification failed");
        }
    });

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn handle_update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>, ApiError> {
    let status = req
        .status
        .ok_or_else(|| ApiError::BadRequest("Status is required".to_string()))?;

    let raw = status.clone();
    let changed = tokio::task::spawn_blocking(move || state.store.update_status(id, &raw)).await??;
    info!(task_id = id, status = %status, rows = changed, "task status updated");

    Ok(Json(UpdateStatusResponse {
        id,
        status: TaskStatus::from(status),
    }))
}
