//! API integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{api, repository::MemoryStore, services::Services, AppState};

/// Router backed by a fresh in-memory store
fn app() -> Router {
    let state = AppState {
        services: Arc::new(Services::new(Arc::new(MemoryStore::new()))),
    };
    api::create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Create a genre and an author, returning their ids
async fn seed(app: &Router) -> (i64, i64) {
    let (_, genre) = send(app, Method::POST, "/api/v1/genres", Some(json!({"name": "Fiction"}))).await;
    let (_, author) = send(app, Method::POST, "/api/v1/authors", Some(json!({"name": "J. Silva"}))).await;
    (
        genre["data"]["id"].as_i64().unwrap(),
        author["data"]["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_create_genre_returns_created() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/genres")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "Fiction"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/api/v1/genres/1");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Genre created successfully");
    assert_eq!(body["data"], json!({"id": 1, "name": "Fiction"}));
}

#[tokio::test]
async fn test_duplicate_genre_is_bad_request() {
    let app = app();
    send(&app, Method::POST, "/api/v1/genres", Some(json!({"name": "Fiction"}))).await;

    let (status, body) = send(&app, Method::POST, "/api/v1/genres", Some(json!({"name": "Fiction"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "duplicate_name");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_get_missing_book_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/v1/books/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"success": false, "message": "Book not found", "error_kind": "not_found"})
    );
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = app();
    let (genre_id, author_id) = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Test Book", "genre_id": genre_id, "author_id": author_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let books = body["data"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["genre_name"], "Fiction");
    assert_eq!(books[0]["author_name"], "J. Silva");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/books/{}", book_id),
        Some(json!({"title": "Renamed Book", "genre_id": genre_id, "author_id": author_id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Renamed Book");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/books/{}", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Book deleted successfully"}));

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(body["data"], json!([]));

    let (status, _) = send(&app, Method::GET, &format!("/api/v1/genres/{}", genre_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_book_with_unknown_genre() {
    let app = app();
    let (_, author_id) = seed(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Test Book", "genre_id": 999, "author_id": author_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "dangling_reference");
    assert_eq!(body["message"], "Genre not found");
}

#[tokio::test]
async fn test_update_book_with_unknown_references_is_not_found() {
    let app = app();
    let (genre_id, author_id) = seed(&app).await;
    let (_, body) = send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Test Book", "genre_id": genre_id, "author_id": author_id})),
    )
    .await;
    let uri = format!("/api/v1/books/{}", body["data"]["id"].as_i64().unwrap());

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "Test Book", "genre_id": 999, "author_id": author_id})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_kind"], "dangling_reference");
    assert_eq!(body["message"], "Genre not found");

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "Test Book", "genre_id": genre_id, "author_id": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_kind"], "dangling_reference");
    assert_eq!(body["message"], "Author not found");

    // Invalid input on update stays a bad request
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "", "genre_id": genre_id, "author_id": author_id})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "invalid_input");
}

#[tokio::test]
async fn test_non_numeric_id_gets_failure_envelope() {
    let app = app();
    for uri in ["/api/v1/books/abc", "/api/v1/genres/abc", "/api/v1/books/author/x"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["error_kind"], "invalid_input");
    }

    let (status, body) = send(&app, Method::DELETE, "/api/v1/authors/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "invalid_input");
}

#[tokio::test]
async fn test_delete_referenced_genre_is_rejected() {
    let app = app();
    let (genre_id, author_id) = seed(&app).await;
    send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Test Book", "genre_id": genre_id, "author_id": author_id})),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/genres/{}", genre_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "integrity_violation");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "integrity_violation");

    let (_, body) = send(&app, Method::GET, "/api/v1/books", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_missing_author_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::PUT, "/api/v1/authors/42", Some(json!({"name": "Nobody"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_kind"], "not_found");
}

#[tokio::test]
async fn test_filters_by_genre_and_author() {
    let app = app();
    let (genre_id, author_id) = seed(&app).await;
    send(
        &app,
        Method::POST,
        "/api/v1/books",
        Some(json!({"title": "Test Book", "genre_id": genre_id, "author_id": author_id})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/books/genre/{}", genre_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["message"], "Books by genre retrieved successfully");

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/books/author/{}", author_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Unknown filter ids give an empty list rather than a not-found error
    let (status, body) = send(&app, Method::GET, "/api/v1/books/genre/999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_malformed_payloads_get_failure_envelope() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/v1/books", Some(json!({"title": "No refs"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error_kind"], "invalid_input");

    let (status, body) = send(&app, Method::POST, "/api/v1/genres", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_kind"], "invalid_input");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Bookshelf API");
}

/// Against a running server: cargo test -- --ignored
#[tokio::test]
#[ignore]
async fn test_live_server_health() {
    let response = reqwest::get("http://localhost:8080/api/v1/health")
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}
