/// Storage abstraction
///
/// Services depend on `&dyn Store` rather than a connection pool, so business rules
/// can be exercised against [`MemoryStore`] without a database. [`PgStore`] is the
/// production backend and delegates to the SQL in [`crate::models`].
///
/// Finders return `Ok(None)` for missing rows. Errors are reserved for constraint
/// violations and backend failures.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::membership::{Membership, ProjectMember, ProjectRole};
use crate::models::project::{CreateProject, Project, ProjectWithRole, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskWithAssignee, UpdateTask};
use crate::models::user::{CreateUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (e.g. duplicate email)
    #[error("already exists")]
    AlreadyExists,

    /// A referenced row doesn't exist (e.g. unknown assignee)
    #[error("invalid reference")]
    InvalidReference,

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::AlreadyExists;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::InvalidReference;
            }
        }
        StoreError::Backend(err.to_string())
    }
}

/// Persistence operations used by the services
#[async_trait]
pub trait Store: Send + Sync {
    // ───────────────────────────── Lifecycle ─────────────────────────────

    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    // ─────────────────────────────── Users ───────────────────────────────

    /// Creates a user; `AlreadyExists` if the email is taken
    async fn create_user(&self, data: CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    // ────────────────────────────── Projects ─────────────────────────────

    /// Creates a project and the owner's editor membership atomically
    async fn create_project(
        &self,
        owner_id: Uuid,
        data: CreateProject,
    ) -> Result<Project, StoreError>;

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Overwrites name and description; None if the project doesn't exist
    async fn update_project(
        &self,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Project>, StoreError>;

    /// Deletes a project with its memberships and tasks; false if it didn't exist
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Projects the user belongs to, oldest first
    async fn list_projects_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ProjectWithRole>, StoreError>;

    // ──────────────────────────── Memberships ────────────────────────────

    async fn find_role(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectRole>, StoreError>;

    /// Adds a membership; `AlreadyExists` for a duplicate pair,
    /// `InvalidReference` if the user or project is unknown
    async fn add_member(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> Result<Membership, StoreError>;

    /// Roster ordered by name (unnamed last), then email
    async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>, StoreError>;

    // ─────────────────────────────── Tasks ───────────────────────────────

    /// Creates a task in `todo`; `InvalidReference` for an unknown project or assignee
    async fn create_task(&self, data: CreateTask) -> Result<Task, StoreError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// A project's tasks with assignee profiles, oldest first
    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<TaskWithAssignee>, StoreError>;

    /// Applies a partial update; None if the task doesn't exist
    async fn update_task(&self, id: Uuid, data: UpdateTask)
        -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;
}
