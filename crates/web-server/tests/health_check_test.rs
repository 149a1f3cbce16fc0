//! Health check endpoint tests.

mod common;

use axum::http::StatusCode;
use chrono::DateTime;
use common::TestApp;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["message"], "API Running");
    let time = json["time"].as_str().expect("time should be a string");
    assert!(DateTime::parse_from_rfc3339(time).is_ok(), "time should be RFC 3339, got {time}");
}

/// The probe must not depend on the database.
#[tokio::test]
async fn health_check_ignores_storage_outage() {
    let app = TestApp::new();
    app.products.set_unavailable(true);
    app.categories.set_unavailable(true);

    let (status, json) = app.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
}

#[tokio::test]
async fn unknown_paths_get_an_enveloped_404() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/api/orders", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "not found");
    assert!(json["data"].is_null());
}
