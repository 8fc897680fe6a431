use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::InterviewListQuery;
use super::repo_types::{CompanyRounds, Interview, InterviewFields, InterviewSummary};
use crate::listing::{order_clause, search_pattern, search_term};

const COLUMNS: &str = "id, user_id, company_name, role, package_offered, job_url, hr_name, \
    hr_contact, round_number, round_type, mode, platform, location, scheduled_at, \
    follow_up_date, status, result, prep_notes, feedback, created_at, updated_at";
const DEFAULT_ORDER: &str = "scheduled_at ASC";
const ORDERING_FIELDS: &[(&str, &str)] = &[
    ("scheduled_at", "scheduled_at"),
    ("created_at", "created_at"),
    ("round_number", "round_number"),
];

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    q: &InterviewListQuery,
) -> anyhow::Result<Vec<Interview>> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM interviews WHERE user_id = "));
    qb.push_bind(user_id);

    if let Some(status) = q.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(result) = q.result {
        qb.push(" AND result = ").push_bind(result);
    }
    if let Some(round_type) = q.round_type {
        qb.push(" AND round_type = ").push_bind(round_type);
    }
    if let Some(mode) = q.mode {
        qb.push(" AND mode = ").push_bind(mode);
    }
    if let Some(term) = search_term(&q.search) {
        let pattern = search_pattern(term);
        qb.push(" AND (company_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR role ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR hr_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    qb.push(" ORDER BY ")
        .push(order_clause(q.ordering.as_deref(), ORDERING_FIELDS, DEFAULT_ORDER));

    let rows = qb
        .build_query_as::<Interview>()
        .fetch_all(db)
        .await
        .context("list interviews")?;
    Ok(rows)
}

/// Scheduled interviews with `scheduled_at` in `[from, until]`.
pub async fn scheduled_between(
    db: &PgPool,
    user_id: Uuid,
    from: OffsetDateTime,
    until: OffsetDateTime,
) -> anyhow::Result<Vec<Interview>> {
    let rows = sqlx::query_as::<_, Interview>(&format!(
        r#"
        SELECT {COLUMNS} FROM interviews
         WHERE user_id = $1 AND status = 'scheduled'
           AND scheduled_at >= $2 AND scheduled_at <= $3
         ORDER BY scheduled_at ASC
        "#
    ))
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_all(db)
    .await
    .context("list upcoming interviews")?;
    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<Option<Interview>> {
    let row = sqlx::query_as::<_, Interview>(&format!(
        "SELECT {COLUMNS} FROM interviews WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get interview")?;
    Ok(row)
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    f: &InterviewFields,
) -> anyhow::Result<Interview> {
    let row = sqlx::query_as::<_, Interview>(&format!(
        r#"
        INSERT INTO interviews (
            user_id, company_name, role, package_offered, job_url, hr_name, hr_contact,
            round_number, round_type, mode, platform, location, scheduled_at,
            follow_up_date, status, result, prep_notes, feedback
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(&f.company_name)
    .bind(&f.role)
    .bind(&f.package_offered)
    .bind(&f.job_url)
    .bind(&f.hr_name)
    .bind(&f.hr_contact)
    .bind(f.round_number)
    .bind(f.round_type)
    .bind(f.mode)
    .bind(f.platform)
    .bind(&f.location)
    .bind(f.scheduled_at)
    .bind(f.follow_up_date)
    .bind(f.status)
    .bind(f.result)
    .bind(&f.prep_notes)
    .bind(&f.feedback)
    .fetch_one(db)
    .await
    .context("insert interview")?;
    Ok(row)
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    id: Uuid,
    f: &InterviewFields,
) -> anyhow::Result<Option<Interview>> {
    let row = sqlx::query_as::<_, Interview>(&format!(
        r#"
        UPDATE interviews
           SET company_name = $3, role = $4, package_offered = $5, job_url = $6,
               hr_name = $7, hr_contact = $8, round_number = $9, round_type = $10,
               mode = $11, platform = $12, location = $13, scheduled_at = $14,
               follow_up_date = $15, status = $16, result = $17, prep_notes = $18,
               feedback = $19, updated_at = now()
         WHERE id = $1 AND user_id = $2
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(user_id)
    .bind(&f.company_name)
    .bind(&f.role)
    .bind(&f.package_offered)
    .bind(&f.job_url)
    .bind(&f.hr_name)
    .bind(&f.hr_contact)
    .bind(f.round_number)
    .bind(f.round_type)
    .bind(f.mode)
    .bind(f.platform)
    .bind(&f.location)
    .bind(f.scheduled_at)
    .bind(f.follow_up_date)
    .bind(f.status)
    .bind(f.result)
    .bind(&f.prep_notes)
    .bind(&f.feedback)
    .fetch_optional(db)
    .await
    .context("update interview")?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM interviews WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await
        .context("delete interview")?;
    Ok(res.rows_affected() > 0)
}

pub async fn rounds_by_company(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<CompanyRounds>> {
    let rows = sqlx::query_as::<_, CompanyRounds>(
        r#"
        SELECT company_name, COUNT(*) AS total_rounds
          FROM interviews
         WHERE user_id = $1
         GROUP BY company_name
         ORDER BY company_name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("count interviews by company")?;
    Ok(rows)
}

pub async fn summary(db: &PgPool, user_id: Uuid) -> anyhow::Result<InterviewSummary> {
    let row = sqlx::query_as::<_, InterviewSummary>(
        r#"
        SELECT COUNT(*)                                        AS total,
               COUNT(*) FILTER (WHERE status = 'scheduled')   AS scheduled,
               COUNT(*) FILTER (WHERE status = 'completed')   AS completed,
               COUNT(*) FILTER (WHERE status = 'cancelled')   AS cancelled,
               COUNT(*) FILTER (WHERE status = 'no_show')     AS no_show,
               COUNT(*) FILTER (WHERE result = 'waiting')     AS waiting,
               COUNT(*) FILTER (WHERE result = 'selected')    AS selected,
               COUNT(*) FILTER (WHERE result = 'rejected')    AS rejected,
               COUNT(*) FILTER (WHERE result = 'on_hold')     AS on_hold
          FROM interviews
         WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(db)
    .await
    .context("summarize interviews")?;
    Ok(row)
}
