// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and profile routes.

use super::json::{JsonBody, PrettyJson};
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::NewUser;
use crate::services::{generate_token, hash_password_blocking};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Registration (no authentication).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user))
}

/// Profile routes. The auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users/me", put(update_me))
}

/// Email and password pair. Missing fields read as empty.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl CredentialsRequest {
    /// Reject an empty email or password.
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation("Empty email or password.".to_string()));
        }
        Ok(())
    }
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new user and hand out their first token.
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, PrettyJson<TokenResponse>)> {
    body.validate()?;

    let token = generate_token(state.config.token_length)
        .map_err(|e| AppError::internal("could not generate token", e))?;
    let digest = hash_password_blocking(body.password)
        .await
        .map_err(|e| AppError::internal("could not hash password", e))?;

    let user = match state
        .users
        .create_user(NewUser::new(body.email, digest, token))
        .await
    {
        Ok(user) => user,
        Err(err @ RepositoryError::EmailTaken) => {
            tracing::info!("Registration rejected: email already taken");
            return Err(AppError::Conflict(err.to_string()));
        }
        Err(err) => return Err(AppError::internal("could not create user", err)),
    };

    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        PrettyJson(TokenResponse { token: user.token }),
    ))
}

/// Partial profile update. Absent or empty fields are left unchanged.
#[derive(Deserialize, Default)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub token: String,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

/// Update the authenticated user's email and/or password.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(mut user)): Extension<AuthUser>,
    JsonBody(body): JsonBody<UpdateProfileRequest>,
) -> Result<PrettyJson<ProfileResponse>> {
    if let Some(email) = non_empty(body.email) {
        user.email = email;
    }
    if let Some(password) = non_empty(body.password) {
        user.password_digest = hash_password_blocking(password)
            .await
            .map_err(|e| AppError::internal("could not hash password", e))?;
    }

    let user = match state.users.update_user(user).await {
        Ok(user) => user,
        Err(err @ RepositoryError::EmailTaken) => return Err(AppError::Conflict(err.to_string())),
        Err(err) => return Err(AppError::internal("could not update user", err)),
    };

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(PrettyJson(ProfileResponse {
        email: user.email,
        token: user.token,
    }))
}
