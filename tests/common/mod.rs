// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use easyalert::config::Config;
use easyalert::db::{InMemoryDb, UserRepository};
use easyalert::models::NewUser;
use easyalert::routes::create_router;
use easyalert::services::{generate_token, hash_password};
use easyalert::AppState;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_store(
        Config::test_default(),
        InMemoryDb::new(),
    ));
    (create_router(state.clone()), state)
}

/// Create a test app whose store fails every operation.
#[allow(dead_code)]
pub fn create_offline_test_app() -> Router {
    let state = Arc::new(AppState::with_store(
        Config::test_default(),
        InMemoryDb::unavailable(),
    ));
    create_router(state)
}

/// Create a test app holding one user, whose store then refuses writes.
/// Returns the router and that user's token.
#[allow(dead_code)]
pub async fn create_read_only_test_app(email: &str, password: &str) -> (Router, String) {
    let config = Config::test_default();
    let token = generate_token(config.token_length).unwrap();
    let digest = hash_password(password).unwrap();

    let db = InMemoryDb::new();
    db.create_user(NewUser::new(email, digest, token.clone()))
        .await
        .unwrap();

    let state = Arc::new(AppState::with_store(config, db.read_only()));
    (create_router(state), token)
}

/// Response status, raw body and content type.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    pub content_type: Option<String>,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body should be JSON")
    }
}

/// Send one request through the router.
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();

    TestResponse {
        status,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
        content_type,
    }
}

/// Register a user and return their token.
#[allow(dead_code)]
pub async fn register(app: &Router, email: &str, password: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(&serde_json::json!({ "email": email, "password": password }).to_string()),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.json()["token"].as_str().unwrap().to_string()
}
