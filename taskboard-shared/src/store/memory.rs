/// In-memory store
///
/// Mirrors the Postgres schema's constraints: unique emails, composite membership
/// keys, foreign keys on project/assignee, and cascading project deletes. Each
/// operation runs under a single lock, so project creation is atomic here too.
///
/// Suitable for tests and local development. Data is lost on restart.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::membership::{Membership, ProjectMember, ProjectRole};
use crate::models::project::{CreateProject, Project, ProjectWithRole, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskStatus, TaskWithAssignee, UpdateTask};
use crate::models::user::{CreateUser, User, UserProfile};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    // Vecs keep insertion (= creation) order
    projects: Vec<Project>,
    memberships: HashMap<(Uuid, Uuid), ProjectRole>,
    tasks: Vec<Task>,
}

impl State {
    fn project_exists(&self, id: Uuid) -> bool {
        self.projects.iter().any(|p| p.id == id)
    }
}

/// Store kept entirely in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Roster order: names ignoring ASCII case, unnamed last, then email
///
/// Matches the Postgres query, which compares bytes under the "C" collation.
fn by_name_then_email(a: &ProjectMember, b: &ProjectMember) -> Ordering {
    match (&a.name, &b.name) {
        (Some(x), Some(y)) => x
            .to_ascii_lowercase()
            .cmp(&y.to_ascii_lowercase())
            .then_with(|| x.cmp(y))
            .then_with(|| a.email.cmp(&b.email)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.email.cmp(&b.email),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.email == data.email) {
            return Err(StoreError::AlreadyExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            image: data.image,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        data: CreateProject,
    ) -> Result<Project, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&owner_id) {
            return Err(StoreError::InvalidReference);
        }

        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            created_at: Utc::now(),
        };
        state.projects.push(project.clone());
        state
            .memberships
            .insert((owner_id, project.id), ProjectRole::Editor);

        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let state = self.state.read().await;
        Ok(state.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        let mut state = self.state.write().await;

        Ok(state.projects.iter_mut().find(|p| p.id == id).map(|project| {
            project.name = data.name;
            project.description = data.description;
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        if state.projects.len() == before {
            return Ok(false);
        }

        state.memberships.retain(|(_, project_id), _| *project_id != id);
        state.tasks.retain(|t| t.project_id != id);

        Ok(true)
    }

    async fn list_projects_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProjectWithRole>, StoreError> {
        let state = self.state.read().await;

        Ok(state
            .projects
            .iter()
            .filter_map(|project| {
                state
                    .memberships
                    .get(&(user_id, project.id))
                    .map(|role| ProjectWithRole {
                        project: project.clone(),
                        role: *role,
                    })
            })
            .collect())
    }

    async fn find_role(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectRole>, StoreError> {
        let state = self.state.read().await;
        Ok(state.memberships.get(&(user_id, project_id)).copied())
    }

    async fn add_member(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> Result<Membership, StoreError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user_id) || !state.project_exists(project_id) {
            return Err(StoreError::InvalidReference);
        }
        if state.memberships.contains_key(&(user_id, project_id)) {
            return Err(StoreError::AlreadyExists);
        }

        state.memberships.insert((user_id, project_id), role);

        Ok(Membership {
            user_id,
            project_id,
            role,
        })
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, StoreError> {
        let state = self.state.read().await;

        let mut members: Vec<ProjectMember> = state
            .memberships
            .iter()
            .filter(|((_, pid), _)| *pid == project_id)
            .filter_map(|((user_id, _), role)| {
                state
                    .users
                    .get(user_id)
                    .map(|user| ProjectMember::new(UserProfile::from(user), *role))
            })
            .collect();
        members.sort_by(by_name_then_email);

        Ok(members)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        let mut state = self.state.write().await;

        if !state.project_exists(data.project_id) {
            return Err(StoreError::InvalidReference);
        }
        if let Some(assignee_id) = data.assignee_id {
            if !state.users.contains_key(&assignee_id) {
                return Err(StoreError::InvalidReference);
            }
        }

        let task = Task {
            id: Uuid::new_v4(),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: TaskStatus::Todo,
            priority: data.priority,
            due_date: data.due_date,
            assignee_id: data.assignee_id,
            created_at: Utc::now(),
        };
        state.tasks.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let state = self.state.read().await;
        Ok(state.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<TaskWithAssignee>, StoreError> {
        let state = self.state.read().await;

        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .map(|task| TaskWithAssignee {
                task: task.clone(),
                assignee: task
                    .assignee_id
                    .and_then(|id| state.users.get(&id))
                    .map(UserProfile::from),
            })
            .collect())
    }

    async fn update_task(
        &self,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        let mut state = self.state.write().await;

        if let Some(Some(assignee_id)) = data.assignee_id {
            if !state.users.contains_key(&assignee_id) {
                return Err(StoreError::InvalidReference);
            }
        }

        Ok(state.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            data.apply_to(task);
            task.clone()
        }))
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;

        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);

        Ok(state.tasks.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskPriority;

    async fn user(store: &MemoryStore, email: &str, name: Option<&str>) -> User {
        store
            .create_user(CreateUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                name: name.map(str::to_string),
                image: None,
            })
            .await
            .unwrap()
    }

    async fn project(store: &MemoryStore, owner: Uuid, name: &str) -> Project {
        store
            .create_project(
                owner,
                CreateProject {
                    name: name.to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
    }

    fn new_task(project_id: Uuid, title: &str) -> CreateTask {
        CreateTask {
            project_id,
            title: title.to_string(),
            description: None,
            priority: TaskPriority::Medium,
            due_date: None,
            assignee_id: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        user(&store, "a@example.com", None).await;

        let err = store
            .create_user(CreateUser {
                email: "a@example.com".to_string(),
                password_hash: "other".to_string(),
                name: None,
                image: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_create_project_adds_owner_as_editor() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com", None).await;
        let p = project(&store, owner.id, "Roadmap").await;

        assert_eq!(
            store.find_role(owner.id, p.id).await.unwrap(),
            Some(ProjectRole::Editor)
        );
        assert_eq!(store.list_members(p.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_project_for_unknown_owner_persists_nothing() {
        let store = MemoryStore::new();
        let err = store
            .create_project(
                Uuid::new_v4(),
                CreateProject {
                    name: "Orphan".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidReference));
        assert!(store.state.read().await.projects.is_empty());
    }

    #[tokio::test]
    async fn test_projects_listed_in_creation_order() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com", None).await;
        let first = project(&store, owner.id, "First").await;
        let second = project(&store, owner.id, "Second").await;

        let listed = store.list_projects_for_user(owner.id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|p| p.project.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com", None).await;
        let viewer = user(&store, "viewer@example.com", None).await;
        let p = project(&store, owner.id, "Roadmap").await;
        store
            .add_member(viewer.id, p.id, ProjectRole::Viewer)
            .await
            .unwrap();
        let task = store.create_task(new_task(p.id, "Design doc")).await.unwrap();

        assert!(store.delete_project(p.id).await.unwrap());

        assert!(store.find_task(task.id).await.unwrap().is_none());
        assert!(store.find_role(owner.id, p.id).await.unwrap().is_none());
        assert!(store.find_role(viewer.id, p.id).await.unwrap().is_none());
        assert!(!store.delete_project(p.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_membership_rejected() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com", None).await;
        let p = project(&store, owner.id, "Roadmap").await;

        let err = store
            .add_member(owner.id, p.id, ProjectRole::Viewer)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_members_sorted_by_name_with_unnamed_last() {
        let store = MemoryStore::new();
        let owner = user(&store, "zed@example.com", Some("Zed")).await;
        let p = project(&store, owner.id, "Roadmap").await;

        let anon = user(&store, "anon@example.com", None).await;
        let alice = user(&store, "alice@example.com", Some("Alice")).await;
        store.add_member(anon.id, p.id, ProjectRole::Viewer).await.unwrap();
        store.add_member(alice.id, p.id, ProjectRole::Editor).await.unwrap();

        let names: Vec<Option<String>> = store
            .list_members(p.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(
            names,
            vec![Some("Alice".to_string()), Some("Zed".to_string()), None]
        );
    }

    #[tokio::test]
    async fn test_member_names_sort_ignoring_case() {
        let store = MemoryStore::new();
        let owner = user(&store, "zoe@example.com", Some("Zoe")).await;
        let p = project(&store, owner.id, "Roadmap").await;

        for (email, name) in [
            ("bob2@example.com", "bob"),
            ("bob1@example.com", "Bob"),
            ("bob0@example.com", "bob"),
        ] {
            let member = user(&store, email, Some(name)).await;
            store.add_member(member.id, p.id, ProjectRole::Viewer).await.unwrap();
        }

        let emails: Vec<String> = store
            .list_members(p.id)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.email)
            .collect();
        assert_eq!(
            emails,
            vec![
                "bob1@example.com",
                "bob0@example.com",
                "bob2@example.com",
                "zoe@example.com",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_assignee_rejected() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com", None).await;
        let p = project(&store, owner.id, "Roadmap").await;

        let mut data = new_task(p.id, "Design doc");
        data.assignee_id = Some(Uuid::new_v4());
        let err = store.create_task(data).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference));

        let task = store.create_task(new_task(p.id, "Design doc")).await.unwrap();
        let err = store
            .update_task(
                task.id,
                UpdateTask {
                    assignee_id: Some(Some(Uuid::new_v4())),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidReference));
    }

    #[tokio::test]
    async fn test_list_tasks_resolves_assignee() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com", Some("Owner")).await;
        let p = project(&store, owner.id, "Roadmap").await;

        let mut assigned = new_task(p.id, "Assigned");
        assigned.assignee_id = Some(owner.id);
        store.create_task(assigned).await.unwrap();
        store.create_task(new_task(p.id, "Unassigned")).await.unwrap();

        let tasks = store.list_tasks(p.id).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].task.title, "Assigned");
        assert_eq!(
            tasks[0].assignee.as_ref().map(|a| a.id),
            Some(owner.id)
        );
        assert!(tasks[1].assignee.is_none());
    }
}
