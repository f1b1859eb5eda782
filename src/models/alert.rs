// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert model and its delivery status.

use chrono::{DateTime, Utc};
use std::fmt;

/// Delivery status of an alert, stored as a small integer.
///
/// Unknown stored codes are kept as [`AlertStatus::Invalid`] rather than
/// rejected, so a bad row never fails a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertStatus {
    #[default]
    Pending,
    Sent,
    Failed,
    Invalid(i16),
}

impl AlertStatus {
    pub fn code(self) -> i16 {
        match self {
            AlertStatus::Pending => 0,
            AlertStatus::Sent => 1,
            AlertStatus::Failed => 2,
            AlertStatus::Invalid(code) => code,
        }
    }

    /// Human-readable name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Sent => "sent",
            AlertStatus::Failed => "failed",
            AlertStatus::Invalid(_) => "invalid status",
        }
    }
}

impl From<i16> for AlertStatus {
    fn from(code: i16) -> Self {
        match code {
            0 => AlertStatus::Pending,
            1 => AlertStatus::Sent,
            2 => AlertStatus::Failed,
            other => AlertStatus::Invalid(other),
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: i64,
    pub subject: String,
    pub status: AlertStatus,
    /// Set only when the alert transitions to [`AlertStatus::Sent`]
    pub sent_at: Option<DateTime<Utc>>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// Record a successful delivery.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.status = AlertStatus::Sent;
        self.sent_at = Some(at);
    }

    /// Record a failed delivery. `sent_at` stays unset.
    pub fn mark_failed(&mut self) {
        self.status = AlertStatus::Failed;
        self.sent_at = None;
    }
}

/// An alert that has not been persisted yet.
///
/// There is no way to choose the initial status or `sent_at`: new alerts
/// are always pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub subject: String,
    pub user_id: i64,
}

impl NewAlert {
    pub fn pending(subject: impl Into<String>, user_id: i64) -> Self {
        Self {
            subject: subject.into(),
            user_id,
        }
    }

    pub fn status(&self) -> AlertStatus {
        AlertStatus::Pending
    }

    /// Attach storage-assigned fields.
    pub fn into_alert(self, id: i64, now: DateTime<Utc>) -> Alert {
        Alert {
            id,
            subject: self.subject,
            status: AlertStatus::Pending,
            sent_at: None,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
        }
    }
}
