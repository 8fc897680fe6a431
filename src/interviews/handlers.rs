use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, patch},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    FeedbackPatch, InterviewInput, InterviewListQuery, InterviewPatch, InterviewResponse,
};
use super::repo;
use super::repo_types::{CompanyRounds, InterviewFields, InterviewSummary};
use super::services::validate_interview;
use crate::{
    auth::AuthUser,
    cache::ResourceKind,
    error::{AppError, AppResult},
    extract::{AppJson, AppQuery, IdPath},
    listing::{cached_list, to_json_bytes},
    state::AppState,
};

const NOT_FOUND: AppError = AppError::NotFound("interview");
const UPCOMING_WINDOW: Duration = Duration::days(7);

pub fn interview_routes() -> Router<AppState> {
    Router::new()
        .route("/interviews", get(list_interviews).post(create_interview))
        .route("/interviews/upcoming", get(upcoming))
        .route("/interviews/by-company", get(by_company))
        .route("/interviews/summary", get(summary))
        .route(
            "/interviews/:id",
            get(get_interview)
                .put(put_interview)
                .patch(patch_interview)
                .delete(delete_interview),
        )
        .route("/interviews/:id/add-feedback", patch(add_feedback))
}

#[instrument(skip(state))]
pub async fn list_interviews(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppQuery(q): AppQuery<InterviewListQuery>,
) -> AppResult<Response> {
    let (db, q) = (&state.db, &q);
    cached_list(&state.cache, ResourceKind::Interview, user_id, q.is_plain(), move || async move {
        let rows = repo::list_by_user(db, user_id, q).await?;
        let items: Vec<InterviewResponse> = rows.into_iter().map(Into::into).collect();
        Ok(to_json_bytes(&items)?)
    })
    .await
}

#[instrument(skip(state, payload))]
pub async fn create_interview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<InterviewInput>,
) -> AppResult<(StatusCode, Json<InterviewResponse>)> {
    let fields = InterviewFields::from(payload);
    validate_interview(&fields).into_result()?;

    let interview = repo::insert(&state.db, user_id, &fields).await?;
    state.cache.invalidate(ResourceKind::Interview, user_id).await;

    info!(%user_id, id = %interview.id, "interview created");
    Ok((StatusCode::CREATED, Json(interview.into())))
}

#[instrument(skip(state))]
pub async fn get_interview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<Json<InterviewResponse>> {
    let interview = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    Ok(Json(interview.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_interview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<InterviewPatch>,
) -> AppResult<Json<InterviewResponse>> {
    payload.missing_required().into_result()?;
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let fields = payload.apply(InterviewFields::from(&current));
    save(&state, user_id, id, fields).await
}

#[instrument(skip(state, payload))]
pub async fn patch_interview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<InterviewPatch>,
) -> AppResult<Json<InterviewResponse>> {
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let fields = payload.apply(InterviewFields::from(&current));
    save(&state, user_id, id, fields).await
}

#[instrument(skip(state, payload))]
pub async fn add_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
    AppJson(payload): AppJson<FeedbackPatch>,
) -> AppResult<Json<InterviewResponse>> {
    let current = repo::get(&state.db, user_id, id).await?.ok_or(NOT_FOUND)?;
    let fields = payload.apply(InterviewFields::from(&current));
    save(&state, user_id, id, fields).await
}

async fn save(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    fields: InterviewFields,
) -> AppResult<Json<InterviewResponse>> {
    validate_interview(&fields).into_result()?;
    let interview = repo::update(&state.db, user_id, id, &fields)
        .await?
        .ok_or(NOT_FOUND)?;
    state.cache.invalidate(ResourceKind::Interview, user_id).await;
    info!(%user_id, %id, "interview updated");
    Ok(Json(interview.into()))
}

#[instrument(skip(state))]
pub async fn delete_interview(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    IdPath(id): IdPath,
) -> AppResult<StatusCode> {
    if !repo::delete(&state.db, user_id, id).await? {
        return Err(NOT_FOUND);
    }
    state.cache.invalidate(ResourceKind::Interview, user_id).await;
    info!(%user_id, %id, "interview deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn upcoming(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<InterviewResponse>>> {
    let now = OffsetDateTime::now_utc();
    let rows = repo::scheduled_between(&state.db, user_id, now, now + UPCOMING_WINDOW).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn by_company(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<CompanyRounds>>> {
    Ok(Json(repo::rounds_by_company(&state.db, user_id).await?))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<InterviewSummary>> {
    Ok(Json(repo::summary(&state.db, user_id).await?))
}
