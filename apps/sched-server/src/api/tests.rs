use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{DateTime, Utc};
use chrono_tz::America::New_York;
use schedule_store::{MemoryScheduleStore, ScheduleStore, SqliteScheduleStore};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{config::Config, create_app, create_state};

fn app_with<S: ScheduleStore + 'static>(store: S) -> Router {
    let config = Config {
        time_zone: "America/New_York".to_string(),
        ..Config::default()
    };
    create_app(create_state(config, store).unwrap())
}

fn app() -> Router {
    app_with(MemoryScheduleStore::new())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
    };
    (status, value)
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

async fn create_standup(app: &Router) -> i64 {
    let (status, event) = send(
        app,
        "POST",
        "/events",
        Some(json!({"title": "Standup", "image": "x.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    event["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_empty_collections_list_as_empty_arrays() {
    let app = app();
    for uri in ["/users", "/events", "/tasks", "/routines"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, json!([]), "{uri}");
    }
}

#[tokio::test]
async fn test_event_and_task_flow() {
    let app = app();

    let (status, event) = send(
        &app,
        "POST",
        "/events",
        Some(json!({"title": "Standup", "image": "x.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event, json!({"id": 1, "title": "Standup", "image": "x.png"}));

    let (status, task) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"start_time": "09:00:00", "end_time": "09:15:00", "event_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["event_id"], json!(1));

    let start: DateTime<Utc> = task["start_time"].as_str().unwrap().parse().unwrap();
    let end: DateTime<Utc> = task["end_time"].as_str().unwrap().parse().unwrap();
    assert_eq!(
        start.with_timezone(&New_York).format("%H:%M").to_string(),
        "09:00"
    );
    assert_eq!((end - start).num_minutes(), 15);

    let (status, fetched) = send(&app, "GET", "/tasks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, task);
}

#[tokio::test]
async fn test_task_with_unknown_event_is_rejected() {
    let app = app();
    create_standup(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"start_time": "09:00:00", "end_time": "09:15:00", "event_id": 42})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_REFERENCE");

    let (_, tasks) = send(&app, "GET", "/tasks", None).await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn test_task_time_errors() {
    let app = app();
    let event_id = create_standup(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"start_time": "half past nine", "end_time": "09:15:00", "event_id": event_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_TIME_FORMAT");

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"start_time": "10:00:00", "end_time": "09:15:00", "event_id": event_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "INVALID_INTERVAL");
}

#[tokio::test]
async fn test_duplicate_user() {
    let app = app();
    let user = json!({"username": "abc", "email": "a@b.com", "birthday": "1990-01-01"});

    let (status, created) = send(&app, "POST", "/users", Some(user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created, user);

    let (status, body) = send(&app, "POST", "/users", Some(user.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONSTRAINT_VIOLATION");

    let (status, fetched) = send(&app, "GET", "/users/abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_user_partial_update() {
    let app = app();
    send(
        &app,
        "POST",
        "/users",
        Some(json!({"username": "abc", "email": "a@b.com", "birthday": "1990-01-01"})),
    )
    .await;

    let (status, updated) = send(
        &app,
        "PUT",
        "/users/abc",
        Some(json!({"email": "new@b.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({"username": "abc", "email": "new@b.com", "birthday": "1990-01-01"})
    );

    let (status, _) = send(&app, "DELETE", "/users/abc", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", "/users/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_keys_are_not_found() {
    let app = app();
    let cases = [
        ("PUT", "/events/7", Some(json!({"title": "x"}))),
        ("DELETE", "/events/7", None),
        ("PUT", "/tasks/7", Some(json!({}))),
        ("DELETE", "/tasks/7", None),
        ("PUT", "/routines/7", Some(json!({"name": "x"}))),
        ("DELETE", "/routines/7", None),
        ("PUT", "/users/nobody", Some(json!({"email": "x"}))),
        ("DELETE", "/users/nobody", None),
        ("GET", "/routines/7", None),
    ];

    for (method, uri, body) in cases {
        let (status, body) = send(&app, method, uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(error_code(&body), "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_malformed_requests() {
    let app = app();

    let (status, body) = send(&app, "GET", "/events/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "MALFORMED_PAYLOAD");

    let (status, body) = send(&app, "POST", "/events", Some(json!({"image": "x.png"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "MALFORMED_PAYLOAD");

    let (status, body) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"start_time": "09:00", "end_time": "09:15", "event_id": "one"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "MALFORMED_PAYLOAD");
}

#[tokio::test]
async fn test_routine_crud() {
    let app = app();

    let (status, routine) = send(
        &app,
        "POST",
        "/routines",
        Some(json!({"name": "Morning", "description": "Stretch"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(routine, json!({"id": 1, "name": "Morning", "description": "Stretch"}));

    let (status, updated) = send(
        &app,
        "PUT",
        "/routines/1",
        Some(json!({"description": "Run"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated, json!({"id": 1, "name": "Morning", "description": "Run"}));

    let (status, _) = send(&app, "DELETE", "/routines/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, routines) = send(&app, "GET", "/routines", None).await;
    assert_eq!(routines, json!([]));
}

#[tokio::test]
async fn test_event_with_tasks_cannot_be_deleted_in_sqlite() {
    let app = app_with(SqliteScheduleStore::in_memory().await.unwrap());
    let event_id = create_standup(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/tasks",
        Some(json!({"start_time": "09:00", "end_time": "09:15", "event_id": event_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "DELETE", &format!("/events/{event_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONSTRAINT_VIOLATION");

    let (status, _) = send(&app, "DELETE", "/tasks/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/events/{event_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
