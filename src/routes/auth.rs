// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token issuing routes.

use super::json::{JsonBody, PrettyJson};
use super::users::{CredentialsRequest, TokenResponse};
use crate::db::UserFilter;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::services::{generate_token, verify_password_blocking, UNKNOWN_USER_DIGEST};
use crate::AppState;
use axum::{
    extract::State,
    routing::{post, put},
    Extension, Router,
};
use std::sync::Arc;

/// Login (no authentication).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth", post(authenticate))
}

/// Token refresh. The auth middleware is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/refresh", put(refresh))
}

/// Exchange email and password for the user's current token.
///
/// An unknown email and a wrong password produce the same response, and both
/// pay for one Argon2 verification.
async fn authenticate(
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<CredentialsRequest>,
) -> Result<PrettyJson<TokenResponse>> {
    body.validate()?;

    let user = match state.users.find_user(&UserFilter::Email(body.email)).await {
        Ok(user) => user,
        Err(err) if err.is_not_found() => {
            verify_password_blocking(UNKNOWN_USER_DIGEST.to_string(), body.password).await;
            return Err(AppError::InvalidCredentials);
        }
        Err(err) => return Err(AppError::internal("an unknown error occured", err)),
    };

    if !verify_password_blocking(user.password_digest, body.password).await {
        tracing::info!(user_id = user.id, "Authentication failed");
        return Err(AppError::InvalidCredentials);
    }

    Ok(PrettyJson(TokenResponse { token: user.token }))
}

/// Rotate the authenticated user's token.
async fn refresh(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(mut user)): Extension<AuthUser>,
) -> Result<PrettyJson<TokenResponse>> {
    user.token = generate_token(state.config.token_length)
        .map_err(|e| AppError::internal("could not generate token", e))?;

    let user = state
        .users
        .update_user(user)
        .await
        .map_err(|e| AppError::internal("could not update token", e))?;

    tracing::info!(user_id = user.id, "Token refreshed");

    Ok(PrettyJson(TokenResponse { token: user.token }))
}
