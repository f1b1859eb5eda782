// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! The handlers only see the [`UserRepository`] and [`AlertRepository`]
//! traits. [`PostgresDb`] is the production implementation; [`InMemoryDb`]
//! backs the tests and local runs without a database.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDb;
pub use postgres::PostgresDb;

use crate::models::{Alert, NewAlert, NewUser, User};
use async_trait::async_trait;

/// Errors raised by repository implementations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// No record matched the lookup or update.
    #[error("record does not exist")]
    NotFound,

    /// The email column's uniqueness constraint rejected the write.
    #[error("Email is already taken.")]
    EmailTaken,

    /// Any other constraint (token uniqueness, alert owner reference).
    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store cannot serve requests at all.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound)
    }
}

/// The finite set of single-user lookups.
///
/// Each variant maps to one fixed, parameterized query; request input only
/// ever travels as a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(i64),
    Token(String),
    Email(String),
}

/// The finite set of alert lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFilter {
    Id(i64),
    UserId(i64),
}

/// CRUD operations for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find exactly one user, or [`RepositoryError::NotFound`].
    async fn find_user(&self, filter: &UserFilter) -> Result<User, RepositoryError>;

    /// All users, ordered by id.
    async fn find_users(&self) -> Result<Vec<User>, RepositoryError>;

    /// Insert a user, assigning id and timestamps.
    ///
    /// A duplicate email fails with [`RepositoryError::EmailTaken`].
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Write every mutable column of `user`, refreshing `updated_at`.
    ///
    /// Fails with [`RepositoryError::NotFound`] when no row has `user.id`.
    async fn update_user(&self, user: User) -> Result<User, RepositoryError>;

    /// Delete a user. The user's alerts are deleted with it.
    async fn delete_user(&self, user: &User) -> Result<(), RepositoryError>;
}

/// CRUD operations for alerts.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Find exactly one alert, or [`RepositoryError::NotFound`].
    async fn find_alert(&self, filter: AlertFilter) -> Result<Alert, RepositoryError>;

    /// Every matching alert in insertion order. May be empty.
    async fn find_alerts(&self, filter: AlertFilter) -> Result<Vec<Alert>, RepositoryError>;

    /// Insert an alert, assigning id and timestamps.
    async fn create_alert(&self, alert: NewAlert) -> Result<Alert, RepositoryError>;

    /// Write subject, status and `sent_at`, refreshing `updated_at`.
    async fn update_alert(&self, alert: Alert) -> Result<Alert, RepositoryError>;

    async fn delete_alert(&self, alert: &Alert) -> Result<(), RepositoryError>;
}
