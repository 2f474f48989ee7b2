/// Project membership model and database operations
///
/// A membership grants one user one role on one project. The (user, project) pair is
/// the primary key, so there is at most one role per user per project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_role AS ENUM ('editor', 'viewer');
///
/// CREATE TABLE project_members (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     role project_role NOT NULL,
///     PRIMARY KEY (user_id, project_id)
/// );
/// ```
///
/// # Roles
///
/// - **editor**: create, update and delete the project and its tasks
/// - **viewer**: read-only access
///
/// There is no hierarchy beyond that and no superuser.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::membership::{Membership, ProjectRole};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid, project_id: Uuid) -> Result<(), sqlx::Error> {
/// if let Some(role) = Membership::get_role(&pool, user_id, project_id).await? {
///     println!("role: {}", role.as_str());
/// }
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserProfile;

/// Role a user holds on a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// May mutate the project and its tasks
    Editor,

    /// Read-only
    Viewer,
}

impl ProjectRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Editor => "editor",
            ProjectRole::Viewer => "viewer",
        }
    }

    /// Whether this role may create, update or delete
    pub fn can_edit(&self) -> bool {
        matches!(self, ProjectRole::Editor)
    }
}

/// Membership row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub role: ProjectRole,
}

/// Roster entry: a member's identity and role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image: Option<String>,
    pub role: ProjectRole,
}

impl ProjectMember {
    /// Builds a roster entry from a profile and role
    pub fn new(profile: UserProfile, role: ProjectRole) -> Self {
        Self {
            user_id: profile.id,
            name: profile.name,
            email: profile.email,
            image: profile.image,
            role,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    user_id: Uuid,
    name: Option<String>,
    email: String,
    image: Option<String>,
    role: ProjectRole,
}

impl From<MemberRow> for ProjectMember {
    fn from(row: MemberRow) -> Self {
        Self {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            image: row.image,
            role: row.role,
        }
    }
}

impl Membership {
    /// Adds a user to a project
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The membership already exists (primary key violation)
    /// - The project or user doesn't exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        project_id: Uuid,
        role: ProjectRole,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO project_members (user_id, project_id, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, project_id, role
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .bind(role)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Gets a user's role on a project
    ///
    /// Exact match on the composite key. None means the user is not a member, or
    /// the project doesn't exist; the two cases are not distinguished.
    pub async fn get_role(
        pool: &PgPool,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<ProjectRole>, sqlx::Error> {
        let role: Option<ProjectRole> = sqlx::query_scalar(
            r#"
            SELECT role FROM project_members
            WHERE user_id = $1 AND project_id = $2
            "#,
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Lists a project's members ordered by display name
    ///
    /// Names compare bytewise ignoring ASCII case. Unnamed users sort last;
    /// ties are broken by email.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<ProjectMember>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT u.id AS user_id, u.name, u.email, u.image, pm.role
            FROM project_members pm
            INNER JOIN users u ON u.id = pm.user_id
            WHERE pm.project_id = $1
            ORDER BY LOWER(u.name COLLATE "C") ASC NULLS LAST,
                     u.name COLLATE "C" ASC,
                     u.email COLLATE "C" ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(ProjectMember::from).collect())
    }
}
