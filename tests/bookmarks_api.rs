use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use bookmarks::config::Locale;
use bookmarks::db::Database;
use bookmarks::handler::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn test_app(locale: Locale) -> Router {
    let db = Database::in_memory().await.expect("in-memory database should open");
    bookmarks::app(AppState {
        db: Arc::new(db),
        locale,
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<Value>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).expect("json body"))
    };
    (status, json)
}

async fn create(app: &Router, name: &str, url: &str, category: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/bookmarks",
        Some(json!({"Name": name, "Url": url, "Category": category})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body.expect("created bookmark")
}

fn names(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|b| b["Name"].as_str().expect("name"))
        .collect()
}

#[tokio::test]
async fn healthcheck_answers_ok() {
    let app = test_app(Locale::En).await;
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Some(json!({"status": "ok"})));
}

#[tokio::test]
async fn post_then_get_round_trips() {
    let app = test_app(Locale::En).await;
    let created = create(&app, "Rust", "https://rust-lang.org", "dev").await;
    let id = created["Id"].as_i64().expect("assigned id");

    let (status, body) = send(&app, Method::GET, &format!("/api/bookmarks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.expect("bookmark");
    assert_eq!(body["Name"], "Rust");
    assert_eq!(body["Url"], "https://rust-lang.org");
    assert_eq!(body["Category"], "dev");
}

#[tokio::test]
async fn bare_question_mark_returns_capability_listing() {
    let app = test_app(Locale::Fr).await;
    create(&app, "Rust", "https://rust-lang.org", "dev").await;

    let (status, body) = send(&app, Method::GET, "/api/bookmarks?", None).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.expect("listing");
    assert_eq!(body[0]["Enlève le signet avec cet id (DELETE)"], "/api/bookmarks/id");

    let (_, body) = send(&app, Method::GET, "/api/bookmarks", None).await;
    assert_eq!(names(&body.expect("bookmarks")), vec!["Rust"]);
}

#[tokio::test]
async fn list_filters_and_sorts() {
    let app = test_app(Locale::En).await;
    create(&app, "B", "https://b.example", "x").await;
    create(&app, "A", "https://a.example", "x").await;
    create(&app, "C", "https://c.example", "y").await;
    create(&app, "Abacus", "https://abacus.example", "y").await;

    let (status, body) = send(&app, Method::GET, "/api/bookmarks?sort=category&sort=name", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body.expect("bookmarks")), vec!["A", "B", "Abacus", "C"]);

    let (_, body) = send(&app, Method::GET, "/api/bookmarks?name=%22a*%22", None).await;
    assert_eq!(names(&body.expect("bookmarks")), vec!["A", "Abacus"]);

    let (_, body) = send(&app, Method::GET, "/api/bookmarks?name=abacus", None).await;
    assert_eq!(names(&body.expect("bookmarks")), vec!["Abacus"]);

    let (_, body) = send(&app, Method::GET, "/api/bookmarks?category='Y'&sort=name", None).await;
    assert_eq!(names(&body.expect("bookmarks")), vec!["Abacus", "C"]);
}

#[tokio::test]
async fn unknown_query_key_is_rejected() {
    let app = test_app(Locale::En).await;
    let (status, body) = send(&app, Method::GET, "/api/bookmarks?foo=bar", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        Some(json!({
            "title": "Invalid parameters.",
            "detail": "One or more parameter keys do not exist.",
            "status": 422
        }))
    );
}

#[tokio::test]
async fn empty_sort_value_counts_as_unknown_key() {
    let app = test_app(Locale::En).await;
    create(&app, "Rust", "https://rust-lang.org", "dev").await;

    for uri in ["/api/bookmarks?sort=", "/api/bookmarks?name="] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.expect("error")["detail"], "One or more parameter keys do not exist.");
    }
}

#[tokio::test]
async fn invalid_sort_value_is_rejected() {
    let app = test_app(Locale::Fr).await;
    let (status, body) = send(&app, Method::GET, "/api/bookmarks?sort=color", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = body.expect("error body");
    assert_eq!(body["title"], "Paramètres invalides.");
    assert_eq!(body["detail"], "La valeur du paramètre sort doit être name ou category.");
}

#[tokio::test]
async fn post_validation_errors() {
    let app = test_app(Locale::En).await;
    create(&app, "Rust", "https://rust-lang.org", "dev").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookmarks",
        Some(json!({"Name": "rust", "Url": "https://doc.rust-lang.org", "Category": "dev"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body.expect("error")["detail"], "A bookmark with that name already exists.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/bookmarks",
        Some(json!({"Name": "Docs", "Url": "   ", "Category": "dev"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body.expect("error")["detail"],
        "Name, Url and Category must not be empty or only whitespace."
    );

    let (status, _) = send(&app, Method::POST, "/api/bookmarks", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn put_updates_and_reports_missing_ids() {
    let app = test_app(Locale::En).await;
    let created = create(&app, "Rust", "https://rust-lang.org", "dev").await;
    let id = created["Id"].as_i64().expect("assigned id");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/bookmarks/{id}"),
        Some(json!({"Id": id, "Name": "Rust Lang", "Url": "https://rust-lang.org", "Category": "lang"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, None);

    let (_, body) = send(&app, Method::GET, &format!("/api/bookmarks/{id}"), None).await;
    assert_eq!(body.expect("bookmark")["Category"], "lang");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/bookmarks/999",
        Some(json!({"Name": "Ghost", "Url": "https://ghost.example", "Category": "none"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.expect("error")["title"], "Not found");
}

#[tokio::test]
async fn delete_removes_bookmark() {
    let app = test_app(Locale::En).await;
    let created = create(&app, "Rust", "https://rust-lang.org", "dev").await;
    let uri = format!("/api/bookmarks/{}", created["Id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, None);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let app = test_app(Locale::En).await;
    let (status, body) = send(&app, Method::GET, "/api/bookmarks/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.expect("error")["status"], 404);
}
