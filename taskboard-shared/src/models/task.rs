/// Task model and database operations
///
/// Tasks are the cards on a project's kanban board. The board's columns are the
/// three status values.
///
/// # Status
///
/// ```text
/// todo ⇄ in_progress ⇄ done   (any value may move to any other)
/// ```
///
/// There is no workflow state machine: any editor may set any status at any time.
/// New tasks always start in `todo`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     assignee_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask, TaskPriority, TaskStatus, UpdateTask};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     title: "Design doc".to_string(),
///     description: None,
///     priority: TaskPriority::Medium,
///     due_date: None,
///     assignee_id: None,
/// }).await?;
///
/// // Drag the card to "done"
/// Task::update(&pool, task.id, UpdateTask {
///     status: Some(TaskStatus::Done),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::user::UserProfile;

/// Kanban column of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!(
                "Invalid status '{}': expected todo, in_progress or done",
                other
            )),
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!(
                "Invalid priority '{}': expected low, medium or high",
                other
            )),
        }
    }
}

/// Task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Owning project (immutable)
    pub project_id: Uuid,

    /// Title (non-empty, trimmed)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Kanban column
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Optional assignee; any existing user, not necessarily a project member
    pub assignee_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task
///
/// There is no status field: new tasks always start in `todo`.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assignee_id: Option<Uuid>,
}

/// Partial update of a task
///
/// `None` leaves a field untouched. For nullable columns `Some(None)` clears the
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub assignee_id: Option<Option<Uuid>>,
}

impl UpdateTask {
    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        *self == UpdateTask::default()
    }

    /// Applies the present fields to a task in place
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
    }
}

/// A task with its assignee's profile resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWithAssignee {
    #[serde(flatten)]
    pub task: Task,

    /// Assignee identity, or null when unassigned
    pub assignee: Option<UserProfile>,
}

#[derive(sqlx::FromRow)]
struct TaskAssigneeRow {
    #[sqlx(flatten)]
    task: Task,
    assignee_name: Option<String>,
    assignee_email: Option<String>,
    assignee_image: Option<String>,
}

impl From<TaskAssigneeRow> for TaskWithAssignee {
    fn from(row: TaskAssigneeRow) -> Self {
        // LEFT JOIN: email is NOT NULL in users, so it is present iff the join matched
        let assignee = match (row.task.assignee_id, row.assignee_email) {
            (Some(id), Some(email)) => Some(UserProfile {
                id,
                name: row.assignee_name,
                email,
                image: row.assignee_image,
            }),
            _ => None,
        };

        Self {
            task: row.task,
            assignee,
        }
    }
}

const TASK_COLUMNS: &str =
    "id, project_id, title, description, status, priority, due_date, assignee_id, created_at";

impl Task {
    /// Creates a task in `todo`
    ///
    /// # Errors
    ///
    /// Returns an error if the project or assignee doesn't exist (foreign key
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (project_id, title, description, status, priority, due_date, assignee_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(TaskStatus::Todo)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.assignee_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists a project's tasks with assignee profiles, oldest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<TaskWithAssignee>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskAssigneeRow>(
            r#"
            SELECT t.id, t.project_id, t.title, t.description, t.status, t.priority,
                   t.due_date, t.assignee_id, t.created_at,
                   u.name AS assignee_name, u.email AS assignee_email, u.image AS assignee_image
            FROM tasks t
            LEFT JOIN users u ON u.id = t.assignee_id
            WHERE t.project_id = $1
            ORDER BY t.created_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskWithAssignee::from).collect())
    }

    /// Applies a partial update
    ///
    /// Only fields present in `data` are written. Returns the updated task, or None
    /// if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut assignments: Vec<String> = Vec::new();
        let mut bind_count = 1;

        let mut push = |column: &str| {
            bind_count += 1;
            assignments.push(format!("{} = ${}", column, bind_count));
        };

        if data.title.is_some() {
            push("title");
        }
        if data.description.is_some() {
            push("description");
        }
        if data.status.is_some() {
            push("status");
        }
        if data.priority.is_some() {
            push("priority");
        }
        if data.due_date.is_some() {
            push("due_date");
        }
        if data.assignee_id.is_some() {
            push("assignee_id");
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING {}",
            assignments.join(", "),
            TASK_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task; returns true if it existed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
