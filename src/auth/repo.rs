use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, ProfileChanges, User};
use crate::error::{AppError, AppResult, FieldErrors};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, bio, avatar, created_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    /// True when `username` belongs to someone other than `except`.
    pub async fn username_taken(
        db: &PgPool,
        username: &str,
        except: Option<Uuid>,
    ) -> anyhow::Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(except)
        .fetch_one(db)
        .await
        .context("check username")?;
        Ok(taken)
    }

    /// Create a new user. A username or email taken in the meantime comes
    /// back as a validation error on that field.
    pub async fn create(db: &PgPool, new: NewUser<'_>) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.username)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.first_name)
        .bind(new.last_name)
        .fetch_one(db)
        .await
        .map_err(|e| user_write_error(e, "insert user"))?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET username = $2, first_name = $3, last_name = $4, bio = $5, avatar = $6
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.bio)
        .bind(&changes.avatar)
        .fetch_one(db)
        .await
        .map_err(|e| user_write_error(e, "update profile"))?;
        Ok(user)
    }

    pub async fn set_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await
            .context("set password")?;
        Ok(())
    }
}

/// Which `users` column a unique constraint guards.
fn unique_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("email") => "email",
        _ => "username",
    }
}

fn user_write_error(e: sqlx::Error, what: &'static str) -> AppError {
    let taken = e
        .as_database_error()
        .filter(|db| db.is_unique_violation())
        .map(|db| unique_field(db.constraint()));
    match taken {
        Some(field) => {
            warn!(field, "unique constraint hit on users");
            AppError::Validation(FieldErrors::single(
                field,
                format!("A user with that {field} already exists."),
            ))
        }
        None => AppError::Internal(anyhow::Error::new(e).context(what)),
    }
}

/// Blacklists a refresh token. Returns `false` if it was already revoked.
/// Rows whose token has expired anyway are dropped on the way.
pub async fn revoke_token(
    db: &PgPool,
    jti: Uuid,
    user_id: Uuid,
    expires_at: OffsetDateTime,
) -> anyhow::Result<bool> {
    let purged = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < now()")
        .execute(db)
        .await
        .context("purge expired blacklist rows")?;
    if purged.rows_affected() > 0 {
        debug!(rows = purged.rows_affected(), "expired blacklist rows purged");
    }

    let res = sqlx::query(
        r#"
        INSERT INTO token_blacklist (jti, user_id, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (jti) DO NOTHING
        "#,
    )
    .bind(jti)
    .bind(user_id)
    .bind(expires_at)
    .execute(db)
    .await
    .context("blacklist token")?;
    Ok(res.rows_affected() == 1)
}

pub async fn is_revoked(db: &PgPool, jti: Uuid) -> anyhow::Result<bool> {
    let revoked: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = $1)")
            .bind(jti)
            .fetch_one(db)
            .await
            .context("check token blacklist")?;
    Ok(revoked)
}
