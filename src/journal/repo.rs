use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::dto::JournalListQuery;
use super::repo_types::{EntryFields, JournalEntry, MoodCount};
use crate::listing::{order_clause, search_pattern, search_term};

const COLUMNS: &str = "id, user_id, title, content, mood, tags, date, created_at, updated_at";
const DEFAULT_ORDER: &str = "date DESC, created_at DESC";
const ORDERING_FIELDS: &[(&str, &str)] = &[("date", "date"), ("created_at", "created_at")];

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    q: &JournalListQuery,
) -> anyhow::Result<Vec<JournalEntry>> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM journal_entries WHERE user_id = "));
    qb.push_bind(user_id);

    if let Some(mood) = q.mood {
        qb.push(" AND mood = ").push_bind(mood);
    }
    if let Some(date) = q.date {
        qb.push(" AND date = ").push_bind(date);
    }
    if let Some(term) = search_term(&q.search) {
        let pattern = search_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR content ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR array_to_string(tags, ' ') ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY ")
        .push(order_clause(q.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER));

    let rows = qb
        .build_query_as::<JournalEntry>()
        .fetch_all(db)
        .await
        .context("list journal entries")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<JournalEntry>> {
    let row = sqlx::query_as::<_, JournalEntry>(&format!(
        "SELECT {COLUMNS} FROM journal_entries WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get journal entry")?;
    Ok(row)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    fields: &EntryFields,
) -> anyhow::Result<JournalEntry> {
    let row = sqlx::query_as::<_, JournalEntry>(&format!(
        r#"
        INSERT INTO journal_entries (user_id, title, content, mood, tags, date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.mood)
    .bind(&fields.tags)
    .bind(fields.date)
    .fetch_one(db)
    .await
    .context("insert journal entry")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    fields: &EntryFields,
) -> anyhow::Result<Option<JournalEntry>> {
    let row = sqlx::query_as::<_, JournalEntry>(&format!(
        r#"
        UPDATE journal_entries
           SET title = $3, content = $4, mood = $5, tags = $6, date = $7, updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&fields.title)
    .bind(&fields.content)
    .bind(fields.mood)
    .bind(&fields.tags)
    .bind(fields.date)
    .fetch_optional(db)
    .await
    .context("update journal entry")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM journal_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete journal entry")?;
    Ok(res.rows_affected() > 0)
}

pub async fn mood_counts(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<MoodCount>> {
    let rows = sqlx::query_as::<_, MoodCount>(
        r#"
        SELECT mood, COUNT(*) AS count
          FROM journal_entries
         WHERE user_id = $1
         GROUP BY mood
         ORDER BY mood
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("count journal moods")?;
    Ok(rows)
}
