// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Easyalert: a minimal alerting backend.
//!
//! Users register, authenticate with a bearer token, and record alerts
//! against their account. Delivery of alerts is handled elsewhere; this
//! crate only stores alert intent and status.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{AlertRepository, UserRepository};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserRepository>,
    pub alerts: Arc<dyn AlertRepository>,
}

impl AppState {
    /// Build state where a single store backs both repositories.
    pub fn with_store<S>(config: Config, store: S) -> Self
    where
        S: UserRepository + AlertRepository + 'static,
    {
        let store = Arc::new(store);
        Self {
            config,
            users: store.clone(),
            alerts: store,
        }
    }
}
