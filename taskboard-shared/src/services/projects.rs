/// Project operations

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{non_blank, Payload, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Access};
use crate::auth::session::AuthContext;
use crate::models::membership::ProjectRole;
use crate::models::project::{CreateProject, ProjectWithRole, UpdateProject};
use crate::models::task::TaskWithAssignee;
use crate::store::Store;

/// Longest accepted project name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Body of a project create or update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ProjectInput {
    /// Trimmed name and description; the name is required
    fn validate(self) -> ServiceResult<(String, Option<String>)> {
        let name = non_blank(self.name)
            .ok_or_else(|| ServiceError::validation("name", "Project name is required"))?;

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ServiceError::validation(
                "name",
                format!("Project name must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }

        Ok((name, non_blank(self.description)))
    }
}

/// A project with the caller's role and its board
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub project: ProjectWithRole,
    pub tasks: Vec<TaskWithAssignee>,
}

/// Projects the caller belongs to, oldest first
pub async fn list(store: &dyn Store, ctx: &AuthContext) -> ServiceResult<Vec<ProjectWithRole>> {
    Ok(store.list_projects_for_user(ctx.user_id()).await?)
}

/// Creates a project with the caller as its editor
pub async fn create(
    store: &dyn Store,
    ctx: &AuthContext,
    input: impl Into<Payload<ProjectInput>>,
) -> ServiceResult<ProjectWithRole> {
    let (name, description) = input.into().parse()?.validate()?;

    let project = store
        .create_project(ctx.user_id(), CreateProject { name, description })
        .await?;

    info!(project_id = %project.id, user_id = %ctx.user_id(), "Project created");

    Ok(ProjectWithRole {
        project,
        role: ProjectRole::Editor,
    })
}

/// A project with its tasks, for any member
pub async fn get(
    store: &dyn Store,
    ctx: &AuthContext,
    project_id: Uuid,
) -> ServiceResult<ProjectDetail> {
    let role = authorize(store, ctx, project_id, Access::Read).await?;

    let project = store
        .find_project(project_id)
        .await?
        .ok_or(ServiceError::NotFoundOrForbidden)?;
    let tasks = store.list_tasks(project_id).await?;

    Ok(ProjectDetail {
        project: ProjectWithRole { project, role },
        tasks,
    })
}

/// Overwrites a project's name and description
pub async fn update(
    store: &dyn Store,
    ctx: &AuthContext,
    project_id: Uuid,
    input: impl Into<Payload<ProjectInput>>,
) -> ServiceResult<ProjectWithRole> {
    let role = authorize(store, ctx, project_id, Access::Write).await?;
    let (name, description) = input.into().parse()?.validate()?;

    let project = store
        .update_project(project_id, UpdateProject { name, description })
        .await?
        .ok_or(ServiceError::NotFoundOrForbidden)?;

    info!(%project_id, user_id = %ctx.user_id(), "Project updated");

    Ok(ProjectWithRole { project, role })
}

/// Deletes a project along with its memberships and tasks
pub async fn delete(store: &dyn Store, ctx: &AuthContext, project_id: Uuid) -> ServiceResult<()> {
    authorize(store, ctx, project_id, Access::Write).await?;

    if !store.delete_project(project_id).await? {
        return Err(ServiceError::NotFoundOrForbidden);
    }

    info!(%project_id, user_id = %ctx.user_id(), "Project deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{CreateTask, TaskPriority};
    use crate::services::test_support::{project_with_viewer, user};
    use crate::store::MemoryStore;

    fn input(name: &str, description: Option<&str>) -> ProjectInput {
        ProjectInput {
            name: Some(name.to_string()),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_makes_creator_editor() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;

        let created = create(&store, &a, input("  Roadmap  ", Some("   ")))
            .await
            .unwrap();
        assert_eq!(created.project.name, "Roadmap");
        assert!(created.project.description.is_none());
        assert_eq!(created.role, ProjectRole::Editor);

        let members = store.list_members(created.project.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, a.user_id());
        assert_eq!(members[0].role, ProjectRole::Editor);

        // Creator can immediately update and delete
        update(&store, &a, created.project.id, input("Renamed", None))
            .await
            .unwrap();
        delete(&store, &a, created.project.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;

        for bad in [ProjectInput::default(), input("   ", None)] {
            let err = create(&store, &a, bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation { field: "name", .. }));
        }
        assert!(list(&store, &a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_name() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;

        let long = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = create(&store, &a, input(&long, None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "name", .. }));
    }

    #[tokio::test]
    async fn test_list_only_shows_memberships() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let b = user(&store, "b@example.com", None).await;
        let c = user(&store, "c@example.com", None).await;

        project_with_viewer(&store, &a, &c).await;
        create(&store, &b, input("B's", None)).await.unwrap();

        let listed = list(&store, &c).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].role, ProjectRole::Viewer);
        assert_eq!(list(&store, &a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_non_member_is_not_found() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let b = user(&store, "b@example.com", None).await;
        let project = create(&store, &a, input("Roadmap", None)).await.unwrap();

        let err = get(&store, &b, project.project.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden));

        let err = get(&store, &a, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden));
    }

    #[tokio::test]
    async fn test_get_returns_tasks_in_creation_order() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let c = user(&store, "c@example.com", None).await;
        let project_id = project_with_viewer(&store, &a, &c).await;

        for title in ["First", "Second"] {
            store
                .create_task(CreateTask {
                    project_id,
                    title: title.to_string(),
                    description: None,
                    priority: TaskPriority::Medium,
                    due_date: None,
                    assignee_id: None,
                })
                .await
                .unwrap();
        }

        let detail = get(&store, &c, project_id).await.unwrap();
        assert_eq!(detail.project.role, ProjectRole::Viewer);
        let titles: Vec<&str> = detail.tasks.iter().map(|t| t.task.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_viewer_cannot_mutate_even_with_invalid_input() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let c = user(&store, "c@example.com", None).await;
        let project_id = project_with_viewer(&store, &a, &c).await;

        let err = update(&store, &c, project_id, input("", None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let err = delete(&store, &c, project_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));
    }

    #[tokio::test]
    async fn test_wrong_typed_body_checked_after_role() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let b = user(&store, "b@example.com", None).await;
        let c = user(&store, "c@example.com", None).await;
        let project_id = project_with_viewer(&store, &a, &c).await;
        let body = || Payload::Json(serde_json::json!({ "name": 7 }));

        let err = update(&store, &c, project_id, body()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let err = update(&store, &b, project_id, body()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFoundOrForbidden));

        let err = update(&store, &a, project_id, body()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation { field: "body", .. }));

        let project = store.find_project(project_id).await.unwrap().unwrap();
        assert_eq!(project.name, "Roadmap");
    }

    #[tokio::test]
    async fn test_update_with_empty_name_leaves_project_unchanged() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let project = create(&store, &a, input("Roadmap", Some("Q3")))
            .await
            .unwrap();

        let err = update(&store, &a, project.project.id, input("", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation { .. }));

        let stored = store.find_project(project.project.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Roadmap");
        assert_eq!(stored.description.as_deref(), Some("Q3"));
    }

    #[tokio::test]
    async fn test_update_overwrites_description() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let project = create(&store, &a, input("Roadmap", Some("Q3")))
            .await
            .unwrap();

        let updated = update(&store, &a, project.project.id, input("Roadmap 2", None))
            .await
            .unwrap();
        assert_eq!(updated.project.name, "Roadmap 2");
        assert!(updated.project.description.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_and_revokes_access() {
        let store = MemoryStore::new();
        let a = user(&store, "a@example.com", None).await;
        let c = user(&store, "c@example.com", None).await;
        let project_id = project_with_viewer(&store, &a, &c).await;

        delete(&store, &a, project_id).await.unwrap();

        assert!(store.list_tasks(project_id).await.unwrap().is_empty());
        assert!(store.list_members(project_id).await.unwrap().is_empty());
        assert!(matches!(
            get(&store, &a, project_id).await.unwrap_err(),
            ServiceError::NotFoundOrForbidden
        ));
    }
}
