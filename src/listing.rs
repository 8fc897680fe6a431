//! Shared pieces of the resource endpoints: ordering, search, cached list
//! payloads and nullable patches.

use std::future::Future;

use anyhow::Context;

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::cache::{ResourceKind, ResponseCache};
use crate::error::{AppError, AppResult};

/// Calendar date used for "today" checks; the service runs on UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn to_json_bytes<T: Serialize>(value: &T) -> anyhow::Result<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(value)?))
}

/// 200 with an already-serialized JSON body.
pub fn json_payload(body: Bytes) -> Response {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response()
}

/// Serves a list payload, through the owner's cache entry when `use_cache` is set.
pub async fn cached_list<F, Fut>(
    cache: &ResponseCache,
    kind: ResourceKind,
    user_id: Uuid,
    use_cache: bool,
    fetch: F,
) -> AppResult<Response>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<Bytes>>,
{
    let body = if use_cache {
        cache.cached_or_compute(kind, user_id, fetch).await?
    } else {
        fetch().await?
    };
    Ok(json_payload(body))
}

/// Like [`cached_list`], but caches the rows themselves so fields derived
/// from the current date can be computed on every read.
pub async fn cached_rows<T, F, Fut>(
    cache: &ResponseCache,
    kind: ResourceKind,
    user_id: Uuid,
    use_cache: bool,
    fetch: F,
) -> AppResult<Vec<T>>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<Vec<T>>>,
{
    if !use_cache {
        return fetch().await;
    }
    let body = cache
        .cached_or_compute(kind, user_id, move || async move {
            let rows = fetch().await?;
            Ok::<_, AppError>(to_json_bytes(&rows)?)
        })
        .await?;
    let rows: Vec<T> = serde_json::from_slice(&body).context("decode cached rows")?;
    Ok(rows)
}

/// Builds an `ORDER BY` body from a comma-separated `ordering` parameter.
///
/// Each entry is a public field name, optionally prefixed with `-` for
/// descending order. Only names present in `allowed` (public name → column)
/// reach the SQL; unknown names are skipped. Falls back to `default` when
/// nothing usable remains.
pub fn order_clause(raw: Option<&str>, allowed: &[(&str, &str)], default: &str) -> String {
    let Some(raw) = raw else {
        return default.to_string();
    };
    let parts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|field| {
            let (name, desc) = match field.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (field, false),
            };
            allowed
                .iter()
                .find(|(public, _)| *public == name)
                .map(|(_, column)| format!("{} {}", column, if desc { "DESC" } else { "ASC" }))
        })
        .collect();
    if parts.is_empty() {
        default.to_string()
    } else {
        parts.join(", ")
    }
}

/// `%term%` for `ILIKE`, with LIKE wildcards in the term escaped.
pub fn search_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Non-empty, trimmed search term.
pub fn search_term(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Lets a PATCH body tell "absent" (`None`) from explicit `null` (`Some(None)`).
/// Use with `#[serde(default, deserialize_with = "listing::nullable")]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
