//! End-to-end tests against a real PostgreSQL database.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use lifeos::{
    app::build_app,
    auth::google::{GoogleIdentityProvider, IdentityProvider, ProviderError, ProviderIdentity},
    cache::{MemoryCache, ResponseCache},
    config::{AppConfig, CacheBackend, CacheConfig, JwtConfig},
    state::AppState,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use time::{format_description::well_known::Rfc3339, Duration as Days, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

/// Accepts any token and treats it as the account's email.
struct EmailTokenIdentity;

#[async_trait]
impl IdentityProvider for EmailTokenIdentity {
    async fn verify(&self, token: &str) -> Result<ProviderIdentity, ProviderError> {
        Ok(ProviderIdentity {
            email: token.to_string(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
        })
    }
}

async fn test_app() -> (Router, sqlx::PgPool) {
    test_app_with(Arc::new(GoogleIdentityProvider::new(None))).await
}

async fn test_app_with(identity: Arc<dyn IdentityProvider>) -> (Router, sqlx::PgPool) {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("connect to database");
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("run migrations");

    let config = Arc::new(AppConfig {
        database_url,
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "integration-secret".into(),
            issuer: "lifeos".into(),
            audience: "lifeos-users".into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        },
        cache: CacheConfig {
            backend: CacheBackend::Memory,
            ttl_seconds: 300,
        },
        google_client_id: None,
    });
    let cache = ResponseCache::new(Arc::new(MemoryCache::new()), Duration::from_secs(300));
    let state = AppState::from_parts(db.clone(), config, cache, identity);
    (build_app(state), db)
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn call_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = call(app, method, uri, token, body).await;
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Registers a fresh user and returns its `(access, refresh)` tokens.
async fn register_with_refresh(app: &Router) -> (String, String) {
    let tag = Uuid::new_v4().simple().to_string();
    let (status, body) = call_json(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": format!("user_{}", &tag[..12]),
            "email": format!("{tag}@example.com"),
            "password": "testpass123",
            "password2": "testpass123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["tokens"]["access"].as_str().unwrap().to_string(),
        body["tokens"]["refresh"].as_str().unwrap().to_string(),
    )
}

/// Registers a fresh user and returns its access token.
async fn register(app: &Router) -> String {
    register_with_refresh(app).await.0
}

async fn create(app: &Router, uri: &str, token: &str, body: Value) -> Value {
    let (status, created) = call_json(app, Method::POST, uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    created
}

fn titles(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect()
}

fn rfc3339_from_now(offset: Days) -> String {
    (OffsetDateTime::now_utc() + offset).format(&Rfc3339).unwrap()
}

#[tokio::test]
#[ignore]
async fn register_then_login() {
    let (app, _) = test_app().await;
    let tag = Uuid::new_v4().simple().to_string();
    let email = format!("{tag}@example.com");

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": format!("u{}", &tag[..10]),
            "email": email,
            "password": "testpass123",
            "password2": "different123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["password"].is_array());

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": format!("u{}", &tag[..10]),
            "email": email,
            "password": "testpass123",
            "password2": "testpass123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["tokens"]["refresh"].is_string());

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "testpass123"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], email.as_str());

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password.");
}

#[tokio::test]
#[ignore]
async fn journal_entry_reports_word_count() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/journal/entries",
        Some(&token),
        Some(json!({
            "title": "Test Entry",
            "content": "Test content for journal entry.",
            "mood": "good",
            "tags": ["test"],
            "date": "2026-02-24",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["word_count"], 5);
    assert_eq!(body["date"], "2026-02-24");
}

#[tokio::test]
#[ignore]
async fn records_are_invisible_to_other_users() {
    let (app, _) = test_app().await;
    let owner = register(&app).await;
    let stranger = register(&app).await;

    let (status, todo) = call_json(
        &app,
        Method::POST,
        "/api/todos",
        Some(&owner),
        Some(json!({"title": "Test Todo", "priority": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());

    let (status, _) = call_json(&app, Method::GET, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call_json(&app, Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = call_json(&app, Method::GET, "/api/todos", Some(&stranger), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (status, _) = call_json(&app, Method::GET, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn cached_list_is_refreshed_after_writes() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    let (_, first) = call(&app, Method::GET, "/api/todos", Some(&token), None).await;
    let (_, second) = call(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(first, second);

    let (status, todo) = call_json(
        &app,
        Method::POST,
        "/api/todos",
        Some(&token),
        Some(json!({"title": "fresh"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = call_json(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/todos/{}/toggle_status", todo["id"].as_str().unwrap());
    let (status, toggled) = call_json(&app, Method::PATCH, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["status"], "in_progress");

    let (_, list) = call_json(&app, Method::GET, "/api/todos", Some(&token), None).await;
    assert_eq!(list[0]["status"], "in_progress");
}

#[tokio::test]
#[ignore]
async fn overdue_excludes_done_and_future() {
    let (app, db) = test_app().await;
    let token = register(&app).await;

    let (_, me) = call_json(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    let user_id: Uuid = me["id"].as_str().unwrap().parse().unwrap();

    // Past due dates cannot be written through the API.
    for (title, status, offset) in [
        ("late", "pending", -2),
        ("late but done", "done", -2),
        ("not yet", "pending", 3),
    ] {
        sqlx::query(
            "INSERT INTO todos (user_id, title, status, due_date) \
             VALUES ($1, $2, $3::todo_status, CURRENT_DATE + $4::int)",
        )
        .bind(user_id)
        .bind(title)
        .bind(status)
        .bind(offset)
        .execute(&db)
        .await
        .unwrap();
    }

    let (status, body) =
        call_json(&app, Method::GET, "/api/todos/overdue", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "late");
    assert_eq!(items[0]["is_overdue"], true);
}

#[tokio::test]
#[ignore]
async fn interview_result_requires_completed_status() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    let (status, interview) = call_json(
        &app,
        Method::POST,
        "/api/interviews",
        Some(&token),
        Some(json!({
            "company_name": "Acme",
            "role": "Backend Engineer",
            "scheduled_at": "2026-03-10T10:00:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{interview}");
    let uri = format!(
        "/api/interviews/{}/add-feedback",
        interview["id"].as_str().unwrap()
    );

    let (status, body) = call_json(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({"result": "selected"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["status"].is_array());

    let (status, body) = call_json(
        &app,
        Method::PATCH,
        &uri,
        Some(&token),
        Some(json!({"result": "selected", "status": "completed", "feedback": "Went well"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company_name"], "Acme");
    assert_eq!(body["feedback"], "Went well");

    let (_, summary) =
        call_json(&app, Method::GET, "/api/interviews/summary", Some(&token), None).await;
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["selected"], 1);
    assert_eq!(summary["completed"], 1);
}

#[tokio::test]
#[ignore]
async fn concurrent_registrations_with_one_payload() {
    let (app, _) = test_app().await;
    let tag = Uuid::new_v4().simple().to_string();
    let payload = json!({
        "username": format!("race_{}", &tag[..12]),
        "email": format!("{tag}@example.com"),
        "password": "testpass123",
        "password2": "testpass123",
    });

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let (app, payload) = (app.clone(), payload.clone());
        tasks.push(tokio::spawn(async move {
            call_json(&app, Method::POST, "/api/auth/register", None, Some(payload)).await
        }));
    }
    let mut created = 0;
    for task in tasks {
        let (status, body) = task.await.unwrap();
        match status {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => assert!(body["fields"].is_object(), "{body}"),
            other => panic!("unexpected {other}: {body}"),
        }
    }
    assert_eq!(created, 1);
}

#[tokio::test]
#[ignore]
async fn logout_blacklists_the_refresh_token() {
    let (app, _) = test_app().await;
    let (access, refresh) = register_with_refresh(&app).await;

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/token/refresh",
        None,
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access"].is_string());

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/logout",
        Some(&access),
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful.");

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/logout",
        Some(&access),
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid token.");

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/token/refresh",
        None,
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is blacklisted");
}

#[tokio::test]
#[ignore]
async fn logout_drops_expired_blacklist_rows() {
    let (app, db) = test_app().await;
    let (access, refresh) = register_with_refresh(&app).await;
    let (_, me) = call_json(&app, Method::GET, "/api/auth/me", Some(&access), None).await;
    let user_id: Uuid = me["id"].as_str().unwrap().parse().unwrap();

    let stale = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO token_blacklist (jti, user_id, expires_at) \
         VALUES ($1, $2, now() - interval '1 day')",
    )
    .bind(stale)
    .bind(user_id)
    .execute(&db)
    .await
    .unwrap();

    let (status, _) = call_json(
        &app,
        Method::POST,
        "/api/auth/logout",
        Some(&access),
        Some(json!({"refresh": refresh})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM token_blacklist WHERE jti = $1")
        .bind(stale)
        .fetch_one(&db)
        .await
        .unwrap();
    assert_eq!(left, 0);
}

#[tokio::test]
#[ignore]
async fn change_password_checks_the_old_one() {
    let (app, _) = test_app().await;
    let tag = Uuid::new_v4().simple().to_string();
    let email = format!("{tag}@example.com");
    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": format!("pw_{}", &tag[..12]),
            "email": email,
            "password": "testpass123",
            "password2": "testpass123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let access = body["tokens"]["access"].as_str().unwrap().to_string();

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/change-password",
        Some(&access),
        Some(json!({"old_password": "not-my-password", "new_password": "newpass456"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["old_password"][0], "Old password is incorrect.");

    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/auth/change-password",
        Some(&access),
        Some(json!({"old_password": "testpass123", "new_password": "newpass456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password changed successfully.");

    for (password, expected) in [
        ("testpass123", StatusCode::UNAUTHORIZED),
        ("newpass456", StatusCode::OK),
    ] {
        let (status, _) = call_json(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": password})),
        )
        .await;
        assert_eq!(status, expected, "{password}");
    }
}

#[tokio::test]
#[ignore]
async fn social_login_creates_once_then_reuses() {
    let (app, _) = test_app_with(Arc::new(EmailTokenIdentity)).await;
    let email = format!("{}@example.com", Uuid::new_v4().simple());

    let (status, first) = call_json(
        &app,
        Method::POST,
        "/api/auth/google",
        None,
        Some(json!({"token": email})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{first}");
    assert_eq!(first["created"], true);
    assert_eq!(first["user"]["email"], email.as_str());
    assert_eq!(first["user"]["first_name"], "Grace");
    assert!(first["tokens"]["access"].is_string());

    let (status, second) = call_json(
        &app,
        Method::POST,
        "/api/auth/google",
        None,
        Some(json!({"token": email})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["created"], false);
    assert_eq!(second["user"]["id"], first["user"]["id"]);

    // Accounts made this way have no password.
    let (status, _) = call_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": ""})),
    )
    .await;
    assert_ne!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn upcoming_covers_the_next_seven_days() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    for (company, offset) in [
        ("Soon", Days::days(2)),
        ("Later", Days::days(9)),
        ("Past", Days::days(-1)),
    ] {
        create(
            &app,
            "/api/interviews",
            &token,
            json!({
                "company_name": company,
                "role": "Engineer",
                "scheduled_at": rfc3339_from_now(offset),
            }),
        )
        .await;
    }

    let (status, body) =
        call_json(&app, Method::GET, "/api/interviews/upcoming", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["company_name"], "Soon");
}

#[tokio::test]
#[ignore]
async fn interviews_grouped_by_company() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    for (company, round) in [("Acme", 1), ("Acme", 2), ("Globex", 1)] {
        create(
            &app,
            "/api/interviews",
            &token,
            json!({
                "company_name": company,
                "role": "Engineer",
                "round_number": round,
                "scheduled_at": rfc3339_from_now(Days::days(20)),
            }),
        )
        .await;
    }

    let (status, body) =
        call_json(&app, Method::GET, "/api/interviews/by-company", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"company_name": "Acme", "total_rounds": 2},
            {"company_name": "Globex", "total_rounds": 1},
        ])
    );
}

#[tokio::test]
#[ignore]
async fn journal_moods_and_future_dates() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    for mood in ["good", "good", "bad"] {
        create(
            &app,
            "/api/journal/entries",
            &token,
            json!({"title": "day", "content": "words here", "mood": mood}),
        )
        .await;
    }

    let (status, body) =
        call_json(&app, Method::GET, "/api/journal/entries/moods", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"mood": "good", "count": 2}, {"mood": "bad", "count": 1}])
    );

    let tomorrow = OffsetDateTime::now_utc().date() + Days::days(1);
    let (status, body) = call_json(
        &app,
        Method::POST,
        "/api/journal/entries",
        Some(&token),
        Some(json!({"title": "t", "content": "c", "date": tomorrow.to_string()})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["date"][0], "Journal date cannot be in the future.");
}

#[tokio::test]
#[ignore]
async fn todo_toggle_cycles_and_summary_counts() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    let todo = create(&app, "/api/todos", &token, json!({"title": "cycle"})).await;
    create(&app, "/api/todos", &token, json!({"title": "other"})).await;
    let uri = format!("/api/todos/{}/toggle_status", todo["id"].as_str().unwrap());

    for expected in ["in_progress", "done", "pending", "in_progress"] {
        let (status, body) = call_json(&app, Method::PATCH, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], expected);
    }

    let (status, body) =
        call_json(&app, Method::GET, "/api/todos/summary", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<(String, i64)> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["status"].as_str().unwrap().to_string(), c["count"].as_i64().unwrap()))
        .collect();
    assert!(counts.contains(&("pending".to_string(), 1)));
    assert!(counts.contains(&("in_progress".to_string(), 1)));
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<i64>(), 2);
}

#[tokio::test]
#[ignore]
async fn todo_list_filters_search_and_ordering() {
    let (app, _) = test_app().await;
    let token = register(&app).await;

    for (title, priority, category) in [
        ("Alpha report", "high", "work"),
        ("beta chores", "low", "home"),
        ("gamma", "medium", "work"),
    ] {
        create(
            &app,
            "/api/todos",
            &token,
            json!({"title": title, "priority": priority, "category": category}),
        )
        .await;
    }

    for (query, expected) in [
        ("priority=high", vec!["Alpha report"]),
        ("category=home", vec!["beta chores"]),
        ("search=REPORT", vec!["Alpha report"]),
        ("ordering=-priority", vec!["Alpha report", "gamma", "beta chores"]),
        ("ordering=priority", vec!["beta chores", "gamma", "Alpha report"]),
    ] {
        let uri = format!("/api/todos?{query}");
        let (status, body) = call_json(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "{query}");
        assert_eq!(titles(&body), expected, "{query}");
    }
}

#[tokio::test]
#[ignore]
async fn writes_to_foreign_records_are_not_found() {
    let (app, _) = test_app().await;
    let owner = register(&app).await;
    let stranger = register(&app).await;

    let todo = create(&app, "/api/todos", &owner, json!({"title": "mine"})).await;
    let todo_uri = format!("/api/todos/{}", todo["id"].as_str().unwrap());
    let interview = create(
        &app,
        "/api/interviews",
        &owner,
        json!({
            "company_name": "Acme",
            "role": "Engineer",
            "scheduled_at": rfc3339_from_now(Days::days(3)),
        }),
    )
    .await;
    let feedback_uri = format!(
        "/api/interviews/{}/add-feedback",
        interview["id"].as_str().unwrap()
    );

    for (method, uri, body) in [
        (Method::PUT, todo_uri.clone(), Some(json!({"title": "theirs"}))),
        (Method::PATCH, todo_uri.clone(), Some(json!({"title": "theirs"}))),
        (Method::PATCH, format!("{todo_uri}/toggle_status"), None),
        (Method::PATCH, feedback_uri, Some(json!({"feedback": "nope"}))),
    ] {
        let (status, _) = call_json(&app, method.clone(), &uri, Some(&stranger), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
    }

    let (_, unchanged) = call_json(&app, Method::GET, &todo_uri, Some(&owner), None).await;
    assert_eq!(unchanged["title"], "mine");
    assert_eq!(unchanged["status"], "pending");
}
