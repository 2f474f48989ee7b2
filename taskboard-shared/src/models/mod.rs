/// Database models for Taskboard
///
/// Each model owns its row types and the SQL that reads and writes them.
///
/// # Models
///
/// - `user`: User accounts and the public profile shape
/// - `project`: Projects (the root aggregate)
/// - `membership`: User-project relationships with roles
/// - `task`: Kanban tasks with status, priority and assignee
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     name: Some("John Doe".to_string()),
///     image: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod membership;
pub mod project;
pub mod task;
pub mod user;
