//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use database::mock::{self, MockCategoryRepository, MockProductRepository};
use serde_json::Value;
use tower::ServiceExt;
use web_server::{create_router, AppState};

/// A router backed by in-memory repositories, with handles to inspect them.
pub struct TestApp {
    pub router: Router,
    pub products: Arc<MockProductRepository>,
    pub categories: Arc<MockCategoryRepository>,
}

impl TestApp {
    /// Products and categories are linked by the foreign key, like the real schema.
    pub fn new() -> Self {
        let (products, categories) = mock::linked();
        let state = AppState::new(products.clone(), categories.clone());
        Self { router: create_router(state), products, categories }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("failed to make request");
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let json = serde_json::from_slice(&body_bytes).expect("response should be valid JSON");
        (status, json)
    }

    /// Creates a category and returns its id.
    pub async fn seed_category(&self, name: &str) -> i64 {
        let body = format!(r#"{{"name":"{name}","description":"{name} description"}}"#);
        let (status, json) = self.send("POST", "/api/category", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_i64().expect("created category should have an id")
    }

    /// Creates a product in `category_id` and returns its id.
    pub async fn seed_product(&self, name: &str, category_id: i64) -> i64 {
        let body = format!(r#"{{"name":"{name}","price":1500,"stock":10,"category_id":{category_id}}}"#);
        let (status, json) = self.send("POST", "/api/product", Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_i64().expect("created product should have an id")
    }
}
