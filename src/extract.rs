//! Request extractors whose rejections are `AppError`s, so malformed bodies,
//! query strings and ids get the same JSON error shape as everything else.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AppError, FieldErrors};

/// JSON request body.
pub struct AppJson<T>(pub T);

/// Query string.
pub struct AppQuery<T>(pub T);

/// The `:id` segment of a record route. An id that is not a UUID cannot name
/// any record, so it is answered like a missing one.
pub struct IdPath(pub Uuid);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::JsonDataError(e)) => {
                debug!(error = %e.body_text(), "json body rejected");
                Err(AppError::Validation(detail_fields(&e.body_text(), "body")))
            }
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "unreadable json body");
                Err(AppError::BadRequest(rejection.body_text()))
            }
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection: QueryRejection| {
                debug!(error = %rejection.body_text(), "query string rejected");
                AppError::Validation(detail_fields(&rejection.body_text(), "query"))
            })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "record id rejected");
                Err(AppError::NotFound("record"))
            }
        }
    }
}

/// Turns a deserializer message into field errors.
///
/// Rejection texts look like `<summary>: <path>: <message> at line 1 column 9`
/// or `<summary>: missing field `x` at line 1 column 2`. Messages that name no
/// field land under `fallback`.
pub(crate) fn detail_fields(text: &str, fallback: &str) -> FieldErrors {
    lazy_static! {
        static ref POSITION: Regex = Regex::new(r" at line \d+ column \d+$").unwrap();
        static ref MISSING_FIELD: Regex = Regex::new(r"missing field `([^`]+)`").unwrap();
        static ref FIELD_PREFIX: Regex = Regex::new(r"^([A-Za-z_][\w.\[\]]*): (.+)$").unwrap();
    }
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);
    let detail = POSITION.replace(detail, "");

    if let Some(caps) = MISSING_FIELD.captures(&detail) {
        return FieldErrors::single(&caps[1], "This field is required.");
    }
    if let Some(caps) = FIELD_PREFIX.captures(&detail) {
        return FieldErrors::single(&caps[1], &caps[2]);
    }
    FieldErrors::single(fallback, detail.into_owned())
}
