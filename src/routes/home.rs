// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API root.

use super::json::PrettyJson;
use crate::AppState;
use axum::{routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api", get(home))
}

#[derive(Serialize)]
pub struct HomeResponse {
    pub easyalert: &'static str,
}

/// Welcome message.
async fn home() -> PrettyJson<HomeResponse> {
    PrettyJson(HomeResponse {
        easyalert: "Alerting made easy",
    })
}
