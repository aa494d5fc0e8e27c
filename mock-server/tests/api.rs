use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{router, Lesson, Store, User, DEMO_TOKEN};
use tokio::sync::RwLock;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn app() -> Router {
    router(Arc::new(RwLock::new(Store::with_demo_data())))
}

fn authed(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Bearer {DEMO_TOKEN}"))
        .body(body.to_string())
        .unwrap()
}

fn anonymous(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

/// Creates a lesson taught by the demo teacher and returns it.
async fn create(app: &Router, title: &str) -> Lesson {
    let body = format!(
        r#"{{"title":"{title}","teacher":{{"id":1,"email":"teacher@classroom.test"}},"attenders":[]}}"#
    );
    let resp = app
        .clone()
        .oneshot(anonymous("POST", "/api-lessons/new", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401() {
    let resp = app()
        .oneshot(anonymous("GET", "/api-lessons/lesson/1", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(&body_bytes(resp).await[..], b"Unauthorized");
}

#[tokio::test]
async fn unknown_token_returns_401() {
    let req = Request::builder()
        .uri("/api-lessons/user/1")
        .header(http::header::AUTHORIZATION, "Bearer nope")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- create ---

#[tokio::test]
async fn create_without_token_returns_201() {
    let app = app();
    let lesson = create(&app, "Algebra").await;

    assert_eq!(lesson.id, Some(1));
    assert_eq!(lesson.title, "Algebra");
    assert_eq!(lesson.teacher.map(|t| t.id), Some(1));
}

#[tokio::test]
async fn create_malformed_json_is_rejected() {
    let resp = app()
        .oneshot(anonymous("POST", "/api-lessons/new", "not json"))
        .await
        .unwrap();

    assert!(resp.status().is_client_error());
}

// --- list / get ---

#[tokio::test]
async fn list_returns_lessons_involving_user() {
    let app = app();
    create(&app, "One").await;
    create(&app, "Two").await;

    let resp = app
        .clone()
        .oneshot(authed("GET", "/api-lessons/user/1", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let lessons: Vec<Lesson> = body_json(resp).await;
    assert_eq!(lessons.len(), 2);

    let resp = app
        .oneshot(authed("GET", "/api-lessons/user/2", ""))
        .await
        .unwrap();
    let lessons: Vec<Lesson> = body_json(resp).await;
    assert!(lessons.is_empty());
}

#[tokio::test]
async fn list_unknown_user_returns_404() {
    let resp = app()
        .oneshot(authed("GET", "/api-lessons/user/99", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_lesson_not_found() {
    let resp = app()
        .oneshot(authed("GET", "/api-lessons/lesson/5", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(&body_bytes(resp).await[..], b"lesson 5 not found");
}

#[tokio::test]
async fn get_lesson_bad_id_returns_400() {
    let resp = app()
        .oneshot(authed("GET", "/api-lessons/lesson/abc", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- edit ---

#[tokio::test]
async fn edit_overwrites_lesson() {
    let app = app();
    let mut lesson = create(&app, "Draft").await;
    lesson.title = "Final".to_string();

    let resp = app
        .clone()
        .oneshot(authed(
            "PUT",
            "/api-lessons/edit",
            &serde_json::to_string(&lesson).unwrap(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Lesson = body_json(resp).await;
    assert_eq!(updated, lesson);

    let resp = app
        .oneshot(authed("GET", "/api-lessons/lesson/1", ""))
        .await
        .unwrap();
    let fetched: Lesson = body_json(resp).await;
    assert_eq!(fetched.title, "Final");
}

#[tokio::test]
async fn edit_without_id_returns_400() {
    let resp = app()
        .oneshot(authed("PUT", "/api-lessons/edit", r#"{"title":"X"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_unknown_lesson_returns_404() {
    let resp = app()
        .oneshot(authed("PUT", "/api-lessons/edit", r#"{"id":77,"title":"X"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- attenders ---

#[tokio::test]
async fn add_attenders_skips_unknown_and_duplicates() {
    let app = app();
    create(&app, "Biology").await;

    let body = r#"["student@classroom.test","ghost@classroom.test","student@classroom.test"]"#;
    let resp = app
        .clone()
        .oneshot(authed("PUT", "/api-lessons/edit/add-attenders/lesson/1", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let attenders: Vec<User> = body_json(resp).await;
    assert_eq!(attenders.len(), 1);
    assert_eq!(attenders[0].id, 2);

    let resp = app
        .oneshot(authed("GET", "/api-lessons/user/2", ""))
        .await
        .unwrap();
    let lessons: Vec<Lesson> = body_json(resp).await;
    assert_eq!(lessons.len(), 1);
}

#[tokio::test]
async fn delete_attenders_removes_listed_users() {
    let app = app();
    create(&app, "History").await;
    app.clone()
        .oneshot(authed(
            "PUT",
            "/api-lessons/edit/add-attenders/lesson/1",
            r#"["student@classroom.test"]"#,
        ))
        .await
        .unwrap();

    let body = r#"{"id":1,"attenders":[{"id":2,"email":"student@classroom.test"}]}"#;
    let resp = app
        .oneshot(authed("PUT", "/api-lessons/edit/delete-attenders", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let remaining: Vec<User> = body_json(resp).await;
    assert!(remaining.is_empty());
}

// --- delete ---

#[tokio::test]
async fn delete_returns_removed_lesson() {
    let app = app();
    create(&app, "Temporary").await;

    let resp = app
        .clone()
        .oneshot(authed("DELETE", "/api-lessons/delete/1", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let removed: Lesson = body_json(resp).await;
    assert_eq!(removed.title, "Temporary");

    let resp = app
        .oneshot(authed("DELETE", "/api-lessons/delete/1", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
