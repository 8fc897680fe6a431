use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{Priority, Todo, TodoFields, TodoStatus};
use crate::error::FieldErrors;
use crate::listing::nullable;

/// POST body.
#[derive(Debug, Deserialize)]
pub struct TodoInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub due_date: Option<Date>,
}

impl From<TodoInput> for TodoFields {
    fn from(i: TodoInput) -> Self {
        Self {
            title: i.title,
            description: i.description,
            priority: i.priority,
            status: i.status,
            category: i.category,
            due_date: i.due_date,
        }
    }
}

/// PUT and PATCH body; `due_date: null` clears the date.
#[derive(Debug, Default, Deserialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TodoStatus>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub due_date: Option<Option<Date>>,
}

impl TodoPatch {
    pub fn missing_required(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.title.is_none() {
            errors.add("title", "This field is required.");
        }
        errors
    }

    pub fn apply(self, mut fields: TodoFields) -> TodoFields {
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
        if let Some(priority) = self.priority {
            fields.priority = priority;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(category) = self.category {
            fields.category = category;
        }
        if let Some(due_date) = self.due_date {
            fields.due_date = due_date;
        }
        fields
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TodoListQuery {
    pub status: Option<TodoStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl TodoListQuery {
    pub fn is_plain(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.search.is_none()
            && self.ordering.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TodoStatus,
    pub category: String,
    pub due_date: Option<Date>,
    pub is_overdue: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TodoResponse {
    pub fn new(t: Todo, today: Date) -> Self {
        Self {
            id: t.id,
            is_overdue: t.is_overdue(today),
            title: t.title,
            description: t.description,
            priority: t.priority,
            status: t.status,
            category: t.category,
            due_date: t.due_date,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}
