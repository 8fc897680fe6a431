use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{JournalEntryInput, JournalEntryPatch, JournalEntryResponse, JournalListQuery};
use super::repo;
use super::repo_types::{EntryFields, MoodCount};
use super::services::validate_entry;
use crate::{
    auth::AuthUser,
    cache::ResourceKind,
    error::{AppError, AppResult},
    extract::{AppJson, AppQuery, IdPath},
    listing::{cached_list, to_json_bytes, today},
    state::AppState,
};

const NOT_FOUND: AppError = AppError::NotFound("journal entry");

pub fn journal_routes() -> Router<AppState> {
    Router::new()
        .route("/journal/entries", get(list_entries).post(create_entry))
        .route("/journal/entries/moods", get(mood_summary))
        .route(
            "/journal/entries/:id",
            get(get_entry)
                .put(put_entry)
                .patch(patch_entry)
                .delete(delete_entry),
        )
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<JournalListQuery>,
) -> AppResult<Response> {
    let (db, q) = (&state.db, &q);
    cached_list(&state.cache, ResourceKind::Journal, user_id, q.is_plain(), move || async move {
        let rows = repo::list_by_user(db, user_id, q).await?;
        let items: Vec<JournalEntryResponse> = rows.into_iter().map(Into::into).collect();
        Ok(to_json_bytes(&items)?)
    })
    .await
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<JournalEntryInput>,
) -> AppResult<(StatusCode, Json<JournalEntryResponse>)> {
    let today = today();
    let fields = payload.into_fields(today);
    validate_entry(&fields, today).into_result()?;

    let entry = repo::insert(&state.db, user_id, &fields).await?;
    state.cache.invalidate(ResourceKind::Journal, user_id).await;

    info!(%user_id, id = %entry.id, "journal entry created");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<JournalEntryResponse>> {
    let entry = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    Ok(Json(entry.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<JournalEntryPatch>,
) -> AppResult<Json<JournalEntryResponse>> {
    payload.missing_required().into_result()?;
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let fields = payload.apply(EntryFields::from(&current));
    save(&state, user_id, id, fields).await
}

#[instrument(skip(state, payload))]
pub async fn patch_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<JournalEntryPatch>,
) -> AppResult<Json<JournalEntryResponse>> {
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let fields = payload.apply(EntryFields::from(&current));
    save(&state, user_id, id, fields).await
}

async fn save(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    fields: EntryFields,
) -> AppResult<Json<JournalEntryResponse>> {
    validate_entry(&fields, today()).into_result()?;
    let entry = repo::update(&state.db, user_id, id, &fields)
        .await?
        .ok_or(NOT_FOUND)?;
    state.cache.invalidate(ResourceKind::Journal, user_id).await;
    info!(%user_id, %id, "journal entry updated");
    Ok(Json(entry.into()))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<StatusCode> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(NOT_FOUND);
    }
    state.cache.invalidate(ResourceKind::Journal, user_id).await;
    info!(%user_id, %id, "journal entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn mood_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<MoodCount>>> {
    Ok(Json(repo::mood_counts(&state.db, user_id).await?))
}
