// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod alert;
pub mod user;

pub use alert::{Alert, AlertStatus, NewAlert};
pub use user::{NewUser, User};
