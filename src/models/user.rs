// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Server-assigned identifier
    pub id: i64,
    /// Login identifier, unique across users
    pub email: String,
    /// Argon2 PHC string; never the plaintext
    pub password_digest: String,
    /// Current bearer credential, rotated on refresh
    pub token: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_digest: String,
    pub token: String,
    pub admin: bool,
}

impl NewUser {
    /// A regular (non-admin) account.
    pub fn new(email: impl Into<String>, password_digest: String, token: String) -> Self {
        Self {
            email: email.into(),
            password_digest,
            token,
            admin: false,
        }
    }

    /// Attach storage-assigned fields.
    pub fn into_user(self, id: i64, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            password_digest: self.password_digest,
            token: self.token,
            admin: self.admin,
            created_at: now,
            updated_at: now,
        }
    }
}
