/// Task endpoints
///
/// # Endpoints
///
/// - `POST /tasks` - Create a task in `todo` (editor of the project)
/// - `PUT /tasks/:id` - Change only the fields present in the body (editor)
/// - `DELETE /tasks/:id` - Delete a task (editor)
///
/// Request bodies use camelCase keys:
///
/// ```json
/// {
///   "projectId": "uuid",
///   "title": "Design doc",
///   "assigneeId": "uuid",
///   "priority": "high",
///   "dueDate": "2025-06-01"
/// }
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{AppJson, IdPath},
    routes::MessageResponse,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::Value;
use taskboard_shared::{
    auth::session::AuthContext,
    models::task::Task,
    services::{
        tasks::{self, NewTaskInput, TaskPatch},
        Payload,
    },
};

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub task: Task,
    pub message: String,
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    AppJson(body): AppJson<Value>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let input: Payload<NewTaskInput> = Payload::Json(body);
    let task = tasks::create(state.store.as_ref(), &ctx, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            task,
            message: "Task created".to_string(),
        }),
    ))
}

/// Partial update
///
/// A missing key is left alone and `null` clears the field. An empty body is
/// accepted and returns the task unchanged.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    IdPath(task_id): IdPath,
    AppJson(body): AppJson<Value>,
) -> ApiResult<Json<TaskResponse>> {
    let patch: Payload<TaskPatch> = Payload::Json(body);
    let task = tasks::update(state.store.as_ref(), &ctx, task_id, patch).await?;

    Ok(Json(TaskResponse {
        task,
        message: "Task updated".to_string(),
    }))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    IdPath(task_id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    tasks::delete(state.store.as_ref(), &ctx, task_id).await?;

    Ok(Json(MessageResponse::new("Task deleted")))
}
