/// PostgreSQL store backed by the model queries

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::db::pool::health_check;
use crate::models::membership::{Membership, ProjectMember, ProjectRole};
use crate::models::project::{CreateProject, Project, ProjectWithRole, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskWithAssignee, UpdateTask};
use crate::models::user::{CreateUser, User};

/// Store over a Postgres connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        data: CreateProject,
    ) -> Result<Project, StoreError> {
        Ok(Project::create_with_owner(&self.pool, owner_id, data).await?)
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError> {
        Ok(Project::update(&self.pool, id, data).await?)
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Project::delete(&self.pool, id).await?)
    }

    async fn list_projects_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProjectWithRole>, StoreError> {
        Ok(Project::list_for_user(&self.pool, user_id).await?)
    }

    async fn find_role(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectRole>, StoreError> {
        Ok(Membership::get_role(&self.pool, user_id, project_id).await?)
    }

    async fn add_member(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> Result<Membership, StoreError> {
        Ok(Membership::create(&self.pool, user_id, project_id, role).await?)
    }

    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, StoreError> {
        Ok(Membership::list_by_project(&self.pool, project_id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<TaskWithAssignee>, StoreError> {
        Ok(Task::list_by_project(&self.pool, project_id).await?)
    }

    async fn update_task(
        &self,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, id).await?)
    }
}
