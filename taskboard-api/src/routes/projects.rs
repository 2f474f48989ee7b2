/// Project endpoints
///
/// # Endpoints
///
/// - `GET /projects` - Projects the caller belongs to
/// - `POST /projects` - Create a project (caller becomes editor)
/// - `GET /projects/:id` - Project with its tasks
/// - `PUT /projects/:id` - Rename / re-describe (editor)
/// - `DELETE /projects/:id` - Delete with all tasks and memberships (editor)
/// - `GET /projects/:id/members` - Roster for assignee selection
///
/// A project the caller doesn't belong to is reported exactly like one that
/// doesn't exist (404).

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
    models::{membership::ProjectMember, project::ProjectWithRole, task::TaskWithAssignee},
    services::{
        members,
        projects::{self, ProjectInput},
        Payload,
    },
};

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectWithRole>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project: ProjectWithRole,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub project: ProjectWithRole,
    pub tasks: Vec<TaskWithAssignee>,
}

#[derive(Debug, Serialize)]
pub struct MemberListResponse {
    pub members: Vec<ProjectMember>,
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<ProjectListResponse>> {
    let projects = projects::list(state.store.as_ref(), &ctx).await?;

    Ok(Json(ProjectListResponse { projects }))
}

/// Create a project
///
/// ```text
/// POST /projects
/// { "name": "Roadmap", "description": "Q3 planning" }
/// ```
pub async fn create_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    AppJson(body): AppJson<Value>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    let input: Payload<ProjectInput> = Payload::Json(body);
    let project = projects::create(state.store.as_ref(), &ctx, input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            project,
            message: "Project created".to_string(),
        }),
    ))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    IdPath(project_id): IdPath,
) -> ApiResult<Json<ProjectDetailResponse>> {
    let detail = projects::get(state.store.as_ref(), &ctx, project_id).await?;

    Ok(Json(ProjectDetailResponse {
        project: detail.project,
        tasks: detail.tasks,
    }))
}

/// Update a project
///
/// Both fields are overwritten: leaving out the description clears it.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    IdPath(project_id): IdPath,
    AppJson(body): AppJson<Value>,
) -> ApiResult<Json<ProjectResponse>> {
    let input: Payload<ProjectInput> = Payload::Json(body);
    let project = projects::update(state.store.as_ref(), &ctx, project_id, input).await?;

    Ok(Json(ProjectResponse {
        project,
        message: "Project updated".to_string(),
    }))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    IdPath(project_id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    projects::delete(state.store.as_ref(), &ctx, project_id).await?;

    Ok(Json(MessageResponse::new("Project deleted")))
}

pub async fn list_members(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    IdPath(project_id): IdPath,
) -> ApiResult<Json<MemberListResponse>> {
    let members = members::list(state.store.as_ref(), &ctx, project_id).await?;

    Ok(Json(MemberListResponse { members }))
}
