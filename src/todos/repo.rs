use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::Date;
use uuid::Uuid;

use super::dto::TodoListQuery;
use super::repo_types::{StatusChange, StatusCount, Todo, TodoFields, TodoStatus};
use crate::listing::{order_clause, search_pattern, search_term};

const COLUMNS: &str =
    "id, user_id, title, description, priority, status, category, due_date, created_at, updated_at";
const DEFAULT_ORDER: &str = "due_date ASC NULLS LAST, priority DESC";
const ORDERING_FIELDS: &[(&str, &str)] = &[
    ("due_date", "due_date"),
    ("priority", "priority"),
    ("created_at", "created_at"),
];

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    q: &TodoListQuery,
) -> anyhow::Result<Vec<Todo>> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM todos WHERE user_id = "));
    qb.push_bind(user_id);

    if let Some(status) = q.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(priority) = q.priority {
        qb.push(" AND priority = ").push_bind(priority);
    }
    if let Some(category) = &q.category {
        qb.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(term) = search_term(&q.search) {
        let pattern = search_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY ")
        .push(order_clause(q.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER));

    let rows = qb
        .build_query_as::<Todo>()
        .fetch_all(db)
        .await
        .context("list todos")?;
    Ok(rows)
}

pub async fn overdue(db: &PgPool, user_id: Uuid, today: Date) -> anyhow::Result<Vec<Todo>> {
    let rows = sqlx::query_as::<_, Todo>(&format!(
        r#"
        SELECT {COLUMNS} FROM todos
         WHERE user_id = $1 AND due_date < $2 AND status <> 'done'
         ORDER BY {DEFAULT_ORDER}
        "#
    ))
    .bind(user_id)
    .bind(today)
    .fetch_all(db)
    .await
    .context("list overdue todos")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Todo>> {
    let row = sqlx::query_as::<_, Todo>(&format!(
        "SELECT {COLUMNS} FROM todos WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get todo")?;
    Ok(row)
}

pub async fn insert(db: &PgPool, user_id: Uuid, fields: &TodoFields) -> anyhow::Result<Todo> {
    let row = sqlx::query_as::<_, Todo>(&format!(
        r#"
        INSERT INTO todos (user_id, title, description, priority, status, category, due_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.priority)
    .bind(fields.status)
    .bind(&fields.category)
    .bind(fields.due_date)
    .fetch_one(db)
    .await
    .context("insert todo")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    fields: &TodoFields,
) -> anyhow::Result<Option<Todo>> {
    let row = sqlx::query_as::<_, Todo>(&format!(
        r#"
        UPDATE todos
           SET title = $3, description = $4, priority = $5, status = $6,
               category = $7, due_date = $8, updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.priority)
    .bind(fields.status)
    .bind(&fields.category)
    .bind(fields.due_date)
    .fetch_optional(db)
    .await
    .context("update todo")?;
    Ok(row)
}

/// Writes only the status; `None` when the todo is missing or foreign.
pub async fn set_status(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    status: TodoStatus,
) -> anyhow::Result<Option<StatusChange>> {
    let row = sqlx::query_as::<_, StatusChange>(
        r#"
        UPDATE todos SET status = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING id, status
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(status)
    .fetch_optional(db)
    .await
    .context("set todo status")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete todo")?;
    Ok(res.rows_affected() > 0)
}

pub async fn status_counts(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<StatusCount>> {
    let rows = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
          FROM todos
         WHERE user_id = $1
         GROUP BY status
         ORDER BY status
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("count todo statuses")?;
    Ok(rows)
}
