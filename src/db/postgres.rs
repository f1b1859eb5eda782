// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL repository implementation.
//!
//! Every statement is a fixed string with bound parameters. Lookups are
//! selected from [`UserFilter`] / [`AlertFilter`] variants, never composed
//! from request input.

use super::{AlertFilter, AlertRepository, RepositoryError, UserFilter, UserRepository};
use crate::models::{Alert, AlertStatus, NewAlert, NewUser, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Constraint guarding `users.email`.
const USERS_EMAIL_KEY: &str = "users_email_key";

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        email TEXT NOT NULL CONSTRAINT users_email_key UNIQUE,
        password_digest TEXT NOT NULL,
        token TEXT NOT NULL CONSTRAINT users_token_key UNIQUE,
        admin BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS alerts (
        id BIGSERIAL PRIMARY KEY,
        subject TEXT NOT NULL,
        status SMALLINT NOT NULL DEFAULT 0,
        sent_at TIMESTAMPTZ NULL,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS alerts_user_id_idx ON alerts (user_id)",
];

const SELECT_USERS: &str = "SELECT id, email, password_digest, token, admin, created_at, updated_at FROM users ORDER BY id";
const SELECT_USER_BY_ID: &str = "SELECT id, email, password_digest, token, admin, created_at, updated_at FROM users WHERE id = $1";
const SELECT_USER_BY_TOKEN: &str = "SELECT id, email, password_digest, token, admin, created_at, updated_at FROM users WHERE token = $1";
const SELECT_USER_BY_EMAIL: &str = "SELECT id, email, password_digest, token, admin, created_at, updated_at FROM users WHERE email = $1";

const SELECT_ALERT_BY_ID: &str = "SELECT id, subject, status, sent_at, user_id, created_at, updated_at FROM alerts WHERE id = $1";
const SELECT_ALERT_BY_USER: &str = "SELECT id, subject, status, sent_at, user_id, created_at, updated_at FROM alerts WHERE user_id = $1 ORDER BY id";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_digest: String,
    token: String,
    admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_digest: row.password_digest,
            token: row.token,
            admin: row.admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AlertRow {
    id: i64,
    subject: String,
    status: i16,
    sent_at: Option<DateTime<Utc>>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AlertRow> for Alert {
    fn from(row: AlertRow) -> Self {
        Alert {
            id: row.id,
            subject: row.subject,
            status: AlertStatus::from(row.status),
            sent_at: row.sent_at,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Translate constraint violations into domain errors.
///
/// A unique violation on `users_email_key` is the one the API reports to
/// clients; other violations keep their constraint name for logging.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some(USERS_EMAIL_KEY) if db_err.is_unique_violation() => {
                return RepositoryError::EmailTaken;
            }
            Some(constraint)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                return RepositoryError::Constraint(constraint.to_string());
            }
            _ => {}
        }
    }
    RepositoryError::Database(err)
}

fn map_read_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        other => RepositoryError::Database(other),
    }
}

/// PostgreSQL-backed store implementing both repositories over one pool.
#[derive(Clone)]
pub struct PostgresDb {
    pool: PgPool,
}

impl PostgresDb {
    /// Connect a pool of at most `max_connections` connections.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        tracing::info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        tracing::info!("DB migrate start");
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        tracing::info!("DB migrate complete");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresDb {
    async fn find_user(&self, filter: &UserFilter) -> Result<User, RepositoryError> {
        let query = match filter {
            UserFilter::Id(id) => sqlx::query_as::<_, UserRow>(SELECT_USER_BY_ID).bind(*id),
            UserFilter::Token(token) => {
                sqlx::query_as::<_, UserRow>(SELECT_USER_BY_TOKEN).bind(token.as_str())
            }
            UserFilter::Email(email) => {
                sqlx::query_as::<_, UserRow>(SELECT_USER_BY_EMAIL).bind(email.as_str())
            }
        };

        query
            .fetch_one(&self.pool)
            .await
            .map(User::from)
            .map_err(map_read_error)
    }

    async fn find_users(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(SELECT_USERS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_digest, token, admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, email, password_digest, token, admin, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(&user.token)
        .bind(user.admin)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::debug!(user_id = row.id, "User created");
        Ok(row.into())
    }

    async fn update_user(&self, user: User) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = $1, password_digest = $2, token = $3, admin = $4,
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $5
            RETURNING id, email, password_digest, token, admin, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_digest)
        .bind(&user.token)
        .bind(user.admin)
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AlertRepository for PostgresDb {
    async fn find_alert(&self, filter: AlertFilter) -> Result<Alert, RepositoryError> {
        alert_query(filter)
            .fetch_one(&self.pool)
            .await
            .map(Alert::from)
            .map_err(map_read_error)
    }

    async fn find_alerts(&self, filter: AlertFilter) -> Result<Vec<Alert>, RepositoryError> {
        let rows = alert_query(filter).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Alert::from).collect())
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert, RepositoryError> {
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            INSERT INTO alerts (subject, status, sent_at, user_id, created_at, updated_at)
            VALUES ($1, $2, NULL, $3, NOW(), NOW())
            RETURNING id, subject, status, sent_at, user_id, created_at, updated_at
            "#,
        )
        .bind(&alert.subject)
        .bind(alert.status().code())
        .bind(alert.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::debug!(alert_id = row.id, user_id = row.user_id, "Alert created");
        Ok(row.into())
    }

    async fn update_alert(&self, alert: Alert) -> Result<Alert, RepositoryError> {
        let row = sqlx::query_as::<_, AlertRow>(
            r#"
            UPDATE alerts
            SET subject = $1, status = $2, sent_at = $3,
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $4
            RETURNING id, subject, status, sent_at, user_id, created_at, updated_at
            "#,
        )
        .bind(&alert.subject)
        .bind(alert.status.code())
        .bind(alert.sent_at)
        .bind(alert.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete_alert(&self, alert: &Alert) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(alert.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn alert_query(
    filter: AlertFilter,
) -> sqlx::query::QueryAs<'static, sqlx::Postgres, AlertRow, sqlx::postgres::PgArguments> {
    match filter {
        AlertFilter::Id(id) => sqlx::query_as(SELECT_ALERT_BY_ID).bind(id),
        AlertFilter::UserId(user_id) => sqlx::query_as(SELECT_ALERT_BY_USER).bind(user_id),
    }
}
