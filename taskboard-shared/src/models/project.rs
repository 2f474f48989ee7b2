/// Project model and database operations
///
/// Projects are the root aggregate: memberships and tasks belong to exactly one
/// project and are removed with it (`ON DELETE CASCADE`).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::{Project, CreateProject};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// // Creates the project and the owner's editor membership in one transaction
/// let project = Project::create_with_owner(&pool, owner_id, CreateProject {
///     name: "Roadmap".to_string(),
///     description: None,
/// }).await?;
///
/// let mine = Project::list_for_user(&pool, owner_id).await?;
/// assert_eq!(mine[0].project.id, project.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::membership::ProjectRole;

/// Project record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Display name (non-empty, trimmed)
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
}

/// Input for updating a project
///
/// Both fields are overwritten; a `None` description clears it.
#[derive(Debug, Clone)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
}

/// A project annotated with the caller's role on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectWithRole {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub project: Project,

    /// Caller's membership role
    pub role: ProjectRole,
}

impl Project {
    /// Creates a project and makes `owner_id` its first editor
    ///
    /// Both inserts run in a single transaction, so a project never exists
    /// without an editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner doesn't exist (foreign key violation) or the
    /// database connection fails. Nothing is persisted on error.
    pub async fn create_with_owner(
        pool: &PgPool,
        owner_id: Uuid,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO project_members (user_id, project_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(owner_id)
        .bind(project.id)
        .bind(ProjectRole::Editor)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Overwrites name and description
    ///
    /// Returns the updated project, or None if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project
    ///
    /// Memberships, tasks and task comments are removed by the schema's cascades.
    /// Returns true if a project was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists every project the user is a member of, oldest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<ProjectWithRole>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectWithRole>(
            r#"
            SELECT p.id, p.name, p.description, p.created_at, pm.role
            FROM projects p
            INNER JOIN project_members pm ON pm.project_id = p.id
            WHERE pm.user_id = $1
            ORDER BY p.created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }
}
