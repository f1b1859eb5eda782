// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration and profile update tests.

use axum::http::StatusCode;
use easyalert::db::UserFilter;
use easyalert::services::verify_password;

mod common;

const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

#[tokio::test]
async fn test_register_returns_token() {
    let (app, state) = common::create_test_app();

    let response = common::send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(r#"{"email":"a@b.com","password":"test1234"}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.content_type.as_deref(), Some(CONTENT_TYPE_JSON));

    let token = response.json()["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 32);
    assert!(token.chars().all(|c| c.is_ascii_alphabetic()));
    assert_eq!(response.body, format!("{{\n  \"token\": \"{}\"\n}}", token));

    let user = state
        .users
        .find_user(&UserFilter::Email("a@b.com".into()))
        .await
        .unwrap();
    assert_eq!(user.token, token);
    assert!(!user.admin);
    assert_ne!(user.password_digest, "test1234");
    assert!(verify_password(&user.password_digest, "test1234"));
}

#[tokio::test]
async fn test_register_rejects_empty_fields() {
    let (app, _) = common::create_test_app();

    for body in [
        r#"{"email":"","password":"test1234"}"#,
        r#"{"email":"a@b.com","password":""}"#,
        r#"{"email":"a@b.com"}"#,
        r#"{}"#,
    ] {
        let response = common::send(&app, "POST", "/api/users", None, Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response.json()["error"], "Empty email or password.");
    }
}

#[tokio::test]
async fn test_register_rejects_invalid_json() {
    let (app, _) = common::create_test_app();

    let response = common::send(&app, "POST", "/api/users", None, Some("{not json")).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()["error"], "invalid json");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (app, _) = common::create_test_app();
    common::register(&app, "a@b.com", "test1234").await;

    let response = common::send(
        &app,
        "POST",
        "/api/users",
        None,
        Some(r#"{"email":"a@b.com","password":"other"}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Email is already taken.");
}

#[tokio::test]
async fn test_register_then_authenticate() {
    let (app, _) = common::create_test_app();

    for (email, password) in [("a@b.com", "test1234"), ("x@y.org", "p w ünïcode")] {
        let token = common::register(&app, email, password).await;
        let body = serde_json::json!({ "email": email, "password": password }).to_string();
        let response = common::send(&app, "POST", "/api/auth", None, Some(&body)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["token"], token.as_str());
    }
}

#[tokio::test]
async fn test_update_profile_email_only() {
    let (app, state) = common::create_test_app();
    let token = common::register(&app, "a@b.com", "test1234").await;
    let before = state
        .users
        .find_user(&UserFilter::Token(token.clone()))
        .await
        .unwrap();

    let response = common::send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(r#"{"email":"new@b.com","password":""}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["email"], "new@b.com");
    assert_eq!(json["token"], token.as_str());

    let after = state.users.find_user(&UserFilter::Id(before.id)).await.unwrap();
    assert_eq!(after.email, "new@b.com");
    assert_eq!(after.password_digest, before.password_digest);
}

#[tokio::test]
async fn test_update_profile_password_only() {
    let (app, _) = common::create_test_app();
    let token = common::register(&app, "a@b.com", "test1234").await;

    let response = common::send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(r#"{"password":"changed"}"#),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["email"], "a@b.com");

    let old = common::send(
        &app,
        "POST",
        "/api/auth",
        None,
        Some(r#"{"email":"a@b.com","password":"test1234"}"#),
    )
    .await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);

    let new = common::send(
        &app,
        "POST",
        "/api/auth",
        None,
        Some(r#"{"email":"a@b.com","password":"changed"}"#),
    )
    .await;
    assert_eq!(new.status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_profile_to_taken_email() {
    let (app, _) = common::create_test_app();
    common::register(&app, "taken@b.com", "test1234").await;
    let token = common::register(&app, "a@b.com", "test1234").await;

    let response = common::send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(r#"{"email":"taken@b.com"}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Email is already taken.");
}

#[tokio::test]
async fn test_update_profile_storage_failure_is_500() {
    let (app, token) = common::create_read_only_test_app("a@b.com", "test1234").await;

    let response = common::send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(r#"{"email":"new@b.com"}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.content_type.as_deref(), Some(CONTENT_TYPE_JSON));
    assert_eq!(response.json()["error"], "could not update user");
    assert!(!response.body.contains("read-only"));
}

#[tokio::test]
async fn test_update_profile_requires_auth() {
    let (app, _) = common::create_test_app();

    let response = common::send(
        &app,
        "PUT",
        "/api/users/me",
        None,
        Some(r#"{"email":"new@b.com"}"#),
    )
    .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json()["error"],
        "Missing or invalid Authorization header."
    );
}
