// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON request and response plumbing.
//!
//! Responses are pretty-printed with two-space indentation and always carry
//! `application/json; charset=UTF-8`. Request bodies are parsed regardless of
//! their declared content type; malformed JSON is a 422 and a body over the
//! size limit is a 413.

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

/// Pretty-printed JSON response.
pub struct PrettyJson<T>(pub T);

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "could not marshal response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))],
                    "{\n  \"error\": \"could not marshal response body\"\n}",
                )
                    .into_response()
            }
        }
    }
}

/// JSON request body extractor with this API's error bodies.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| match err.status() {
                StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge,
                _ => AppError::internal("could not read http body", err),
            })?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|_| AppError::Unprocessable("invalid json".to_string()))
    }
}
