// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert routes for authenticated users.

use super::json::{JsonBody, PrettyJson};
use crate::db::AlertFilter;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Alert, NewAlert};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Extension, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/alerts", get(list_alerts).post(create_alert))
}

/// Any `status` or `sent_at` a client sends is ignored.
#[derive(Deserialize)]
pub struct CreateAlertRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Record a new pending alert for the authenticated user.
async fn create_alert(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    JsonBody(body): JsonBody<CreateAlertRequest>,
) -> Result<StatusCode> {
    if body.subject.is_empty() || body.message.is_empty() {
        return Err(AppError::Unprocessable(
            "Subject or message not given.".to_string(),
        ));
    }

    let alert = state
        .alerts
        .create_alert(NewAlert::pending(body.subject, user.id))
        .await
        .map_err(|e| AppError::internal("could not create alert", e))?;

    tracing::info!(alert_id = alert.id, user_id = user.id, "Alert created");

    Ok(StatusCode::CREATED)
}

/// One alert as listed to its owner.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct AlertSummary {
    pub subject: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    pub created_at: String,
}

impl From<Alert> for AlertSummary {
    fn from(alert: Alert) -> Self {
        AlertSummary {
            subject: alert.subject,
            status: alert.status.as_str(),
            sent_at: alert.sent_at.map(format_utc_rfc3339),
            created_at: format_utc_rfc3339(alert.created_at),
        }
    }
}

/// List the authenticated user's alerts in creation order.
async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<PrettyJson<Vec<AlertSummary>>> {
    let alerts = state
        .alerts
        .find_alerts(AlertFilter::UserId(user.id))
        .await
        .map_err(|e| AppError::internal("could not fetch alerts", e))?;

    tracing::debug!(user_id = user.id, count = alerts.len(), "Fetched alerts");

    Ok(PrettyJson(
        alerts.into_iter().map(AlertSummary::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertStatus;
    use chrono::{TimeZone, Utc};

    fn alert(status: AlertStatus, sent: bool) -> Alert {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        Alert {
            id: 1,
            subject: "disk full".into(),
            status,
            sent_at: sent.then(|| Utc.with_ymd_and_hms(2024, 1, 2, 3, 5, 0).unwrap()),
            user_id: 9,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_summary_omits_unset_sent_at() {
        let summary = AlertSummary::from(alert(AlertStatus::Pending, false));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "subject": "disk full",
                "status": "pending",
                "created_at": "2024-01-02T03:04:05Z"
            })
        );
    }

    #[test]
    fn test_summary_includes_sent_at() {
        let summary = AlertSummary::from(alert(AlertStatus::Sent, true));
        assert_eq!(summary.status, "sent");
        assert_eq!(summary.sent_at.as_deref(), Some("2024-01-02T03:05:00Z"));
    }

    #[test]
    fn test_summary_tolerates_unknown_status() {
        let summary = AlertSummary::from(alert(AlertStatus::from(42), false));
        assert_eq!(summary.status, "invalid status");
    }
}
