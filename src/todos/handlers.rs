use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{TodoInput, TodoListQuery, TodoPatch, TodoResponse};
use super::repo;
use super::repo_types::{StatusChange, StatusCount, TodoFields};
use super::services::validate_todo;
use crate::{
    auth::AuthUser,
    cache::ResourceKind,
    error::{AppError, AppResult},
    extract::{AppJson, AppQuery, IdPath},
    listing::{cached_rows, today},
    state::AppState,
};

const NOT_FOUND: AppError = AppError::NotFound("todo");

pub fn todo_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/overdue", get(overdue_todos))
        .route("/todos/summary", get(status_summary))
        .route(
            "/todos/:id",
            get(get_todo).put(put_todo).patch(patch_todo).delete(delete_todo),
        )
        .route("/todos/:id/toggle_status", patch(toggle_status))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<TodoListQuery>,
) -> AppResult<Json<Vec<TodoResponse>>> {
    let (db, q) = (&state.db, &q);
    let rows = cached_rows(&state.cache, ResourceKind::Todo, user_id, q.is_plain(), move || async move {
        Ok(repo::list_by_user(db, user_id, q).await?)
    })
    .await?;
    let today = today();
    Ok(Json(rows.into_iter().map(|t| TodoResponse::new(t, today)).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<TodoInput>,
) -> AppResult<(StatusCode, Json<TodoResponse>)> {
    let today = today();
    let fields = TodoFields::from(payload);
    validate_todo(&fields, None, today).into_result()?;

    let todo = repo::insert(&state.db, user_id, &fields).await?;
    state.cache.invalidate(ResourceKind::Todo, user_id).await;

    info!(%user_id, id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(TodoResponse::new(todo, today))))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<TodoResponse>> {
    let todo = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    Ok(Json(TodoResponse::new(todo, today())))
}

#[instrument(skip(state, payload))]
pub async fn put_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<TodoPatch>,
) -> AppResult<Json<TodoResponse>> {
    payload.missing_required().into_result()?;
    update(&state, user_id, id, payload).await
}

#[instrument(skip(state, payload))]
pub async fn patch_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<TodoPatch>,
) -> AppResult<Json<TodoResponse>> {
    update(&state, user_id, id, payload).await
}

async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    payload: TodoPatch,
) -> AppResult<Json<TodoResponse>> {
    let today = today();
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let fields = payload.apply(TodoFields::from(&current));
    validate_todo(&fields, Some(current.due_date), today).into_result()?;

    let todo = repo::update(&state.db, user_id, id, &fields)
        .await?
        .ok_or(NOT_FOUND)?;
    state.cache.invalidate(ResourceKind::Todo, user_id).await;
    info!(%user_id, %id, "todo updated");
    Ok(Json(TodoResponse::new(todo, today)))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<StatusCode> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(NOT_FOUND);
    }
    state.cache.invalidate(ResourceKind::Todo, user_id).await;
    info!(%user_id, %id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn toggle_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<StatusChange>> {
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let change = repo::set_status(&state.db, user_id, id, current.status.next())
        .await?
        .ok_or(NOT_FOUND)?;
    state.cache.invalidate(ResourceKind::Todo, user_id).await;
    info!(%user_id, %id, status = ?change.status, "todo status toggled");
    Ok(Json(change))
}

#[instrument(skip(state))]
pub async fn overdue_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<TodoResponse>>> {
    let today = today();
    let rows = repo::overdue(&state.db, user_id, today).await?;
    Ok(Json(rows.into_iter().map(|t| TodoResponse::new(t, today)).collect()))
}

#[instrument(skip(state))]
pub async fn status_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<StatusCount>>> {
    Ok(Json(repo::status_counts(&state.db, user_id).await?))
}
