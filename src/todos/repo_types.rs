use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Declared low → high in the database enum, so `ORDER BY priority` ranks by
/// importance rather than by name.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "todo_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "todo_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TodoStatus {
    /// pending → in_progress → done → pending
    pub fn next(self) -> Self {
        match self {
            TodoStatus::Pending => TodoStatus::InProgress,
            TodoStatus::InProgress => TodoStatus::Done,
            TodoStatus::Done => TodoStatus::Pending,
        }
    }
}

/// Row of `todos`. Serializable so list caching can store rows rather than
/// rendered responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TodoStatus,
    pub category: String,
    pub due_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Todo {
    pub fn is_overdue(&self, today: Date) -> bool {
        matches!(self.due_date, Some(due) if due < today) && self.status != TodoStatus::Done
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TodoStatus,
    pub category: String,
    pub due_date: Option<Date>,
}

impl From<&Todo> for TodoFields {
    fn from(t: &Todo) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
            priority: t.priority,
            status: t.status,
            category: t.category.clone(),
            due_date: t.due_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusCount {
    pub status: TodoStatus,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StatusChange {
    pub id: Uuid,
    pub status: TodoStatus,
}
