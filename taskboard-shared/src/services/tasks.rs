/// Task operations
///
/// Tasks are authorized through their project: the task is resolved first, then
/// the caller's role on the owning project is checked. A missing task and a task
/// in someone else's project are indistinguishable.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::{double_option, non_blank, Payload, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Access};
use crate::auth::session::AuthContext;
use crate::models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask};
use crate::store::{Store, StoreError};

/// Body of a task create
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTaskInput {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

/// Body of a task update
///
/// A missing key leaves the field untouched; `null` clears it. For description,
/// due date and assignee an empty string also clears.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<String>>,
}

fn parse_title(title: Option<String>) -> ServiceResult<String> {
    non_blank(title).ok_or_else(|| ServiceError::validation("title", "Task title is required"))
}

fn parse_status(value: &str) -> ServiceResult<TaskStatus> {
    value
        .parse::<TaskStatus>()
        .map_err(|e| ServiceError::validation("status", e))
}

fn parse_priority(value: &str) -> ServiceResult<TaskPriority> {
    value
        .parse::<TaskPriority>()
        .map_err(|e| ServiceError::validation("priority", e))
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used
fn parse_due_date(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| {
            ServiceError::validation(
                "dueDate",
                format!("Invalid date '{}': expected YYYY-MM-DD", value),
            )
        })
}

fn parse_assignee(value: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| ServiceError::validation("assigneeId", "Assignee must be a valid user id"))
}

/// Maps a foreign key failure on write to an unknown-assignee error
fn assignee_reference(err: StoreError) -> ServiceError {
    match err {
        StoreError::InvalidReference => {
            ServiceError::validation("assigneeId", "Assignee does not exist")
        }
        other => ServiceError::Store(other),
    }
}

/// Resolves a task and checks the caller's access to its project
async fn authorized_task(
    store: &dyn Store,
    ctx: &AuthContext,
    task_id: Uuid,
    access: Access,
) -> ServiceResult<Task> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or(ServiceError::NotFoundOrForbidden)?;

    authorize(store, ctx, task.project_id, access).await?;

    Ok(task)
}

/// The project a create targets, read before the rest of the body
///
/// A missing or blank id is a validation error. Anything else that isn't a
/// UUID string can't name a project the caller belongs to.
fn target_project(input: &Payload<NewTaskInput>) -> ServiceResult<Uuid> {
    let raw = match input {
        Payload::Typed(input) => input.project_id.clone().map(Value::String),
        Payload::Json(body) => body.get("projectId").cloned(),
    };

    let id = match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => non_blank(Some(id)),
        Some(_) => return Err(ServiceError::NotFoundOrForbidden),
    }
    .ok_or_else(|| ServiceError::validation("projectId", "Project id is required"))?;

    Uuid::parse_str(&id).map_err(|_| ServiceError::NotFoundOrForbidden)
}

/// Creates a task in `todo` on a project the caller edits
pub async fn create(
    store: &dyn Store,
    ctx: &AuthContext,
    input: impl Into<Payload<NewTaskInput>>,
) -> ServiceResult<Task> {
    let input = input.into();
    let project_id = target_project(&input)?;

    authorize(store, ctx, project_id, Access::Write).await?;

    let input = input.parse()?;
    let title = parse_title(input.title)?;
    let priority = match non_blank(input.priority) {
        Some(p) => parse_priority(&p)?,
        None => TaskPriority::default(),
    };
    let due_date = non_blank(input.due_date)
        .map(|d| parse_due_date(&d))
        .transpose()?;
    let assignee_id = non_blank(input.assignee_id)
        .map(|a| parse_assignee(&a))
        .transpose()?;

    let task = store
        .create_task(CreateTask {
            project_id,
            title,
            description: non_blank(input.description),
            priority,
            due_date,
            assignee_id,
        })
        .await
        .map_err(assignee_reference)?;

    info!(task_id = %task.id, %project_id, user_id = %ctx.user_id(), "Task created");

    Ok(task)
}

/// Applies the fields present in `patch` to a task
pub async fn update(
    store: &dyn Store,
    ctx: &AuthContext,
    task_id: Uuid,
    patch: impl Into<Payload<TaskPatch>>,
) -> ServiceResult<Task> {
    authorized_task(store, ctx, task_id, Access::Write).await?;
    let patch = patch.into().parse()?;

    let mut changes = UpdateTask::default();

    if let Some(title) = patch.title {
        changes.title = Some(parse_title(title)?);
    }
    if let Some(description) = patch.description {
        changes.description = Some(non_blank(description));
    }
    if let Some(status) = patch.status {
        let status =
            status.ok_or_else(|| ServiceError::validation("status", "Status cannot be cleared"))?;
        changes.status = Some(parse_status(&status)?);
    }
    if let Some(priority) = patch.priority {
        let priority = priority
            .ok_or_else(|| ServiceError::validation("priority", "Priority cannot be cleared"))?;
        changes.priority = Some(parse_priority(&priority)?);
    }
    if let Some(due_date) = patch.due_date {
        changes.due_date = Some(non_blank(due_date).map(|d| parse_due_date(&d)).transpose()?);
    }
    if let Some(assignee_id) = patch.assignee_id {
        changes.assignee_id = Some(
            non_blank(assignee_id)
                .map(|a| parse_assignee(&a))
                .transpose()?,
        );
    }

    let task = store
        .update_task(task_id, changes)
        .await
        .map_err(assignee_reference)?
        .ok_or(ServiceError::NotFoundOrForbidden)?;

    info!(%task_id, user_id = %ctx.user_id(), status = %task.status, "Task updated");

    Ok(task)
}

/// Deletes a task
pub async fn delete(store: &dyn Store, ctx: &AuthContext, task_id: Uuid) -> ServiceResult<()> {
    authorized_task(store, ctx, task_id, Access::Write).await?;

    if !store.delete_task(task_id).await? {
        return Err(ServiceError::NotFoundOrForbidden);
    }

    info!(%task_id, user_id = %ctx.user_id(), "Task deleted");
    Ok(())
}
