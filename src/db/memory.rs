// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process repository implementation.
//!
//! Enforces the same constraints as the PostgreSQL schema: unique email,
//! unique token, alerts referencing an existing user, and cascade on user
//! deletion.

use super::{AlertFilter, AlertRepository, RepositoryError, UserFilter, UserRepository};
use crate::models::{Alert, NewAlert, NewUser, User};
use crate::time_utils::now_micros;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    last_user_id: i64,
    last_alert_id: i64,
    users: BTreeMap<i64, User>,
    alerts: BTreeMap<i64, Alert>,
}

impl Tables {
    fn check_user_unique(
        &self,
        email: &str,
        token: &str,
        skip_id: Option<i64>,
    ) -> Result<(), RepositoryError> {
        let others = self.users.values().filter(|u| Some(u.id) != skip_id);
        for other in others {
            if other.email == email {
                return Err(RepositoryError::EmailTaken);
            }
            if other.token == token {
                return Err(RepositoryError::Constraint("users_token_key".to_string()));
            }
        }
        Ok(())
    }
}

/// Which operations a store refuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Fault {
    #[default]
    None,
    Writes,
    All,
}

/// Repository backed by in-process maps.
#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
    fault: Fault,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, for exercising error paths.
    pub fn unavailable() -> Self {
        Self {
            tables: Mutex::default(),
            fault: Fault::All,
        }
    }

    /// Keep the current contents but fail every write from now on.
    pub fn read_only(self) -> Self {
        Self {
            fault: Fault::Writes,
            ..self
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        if self.fault == Fault::All {
            return Err(RepositoryError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("in-memory store is poisoned".to_string()))
    }

    fn tables_mut(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        if self.fault == Fault::Writes {
            return Err(RepositoryError::Unavailable(
                "in-memory store is read-only".to_string(),
            ));
        }
        self.tables()
    }
}

#[async_trait]
impl UserRepository for InMemoryDb {
    async fn find_user(&self, filter: &UserFilter) -> Result<User, RepositoryError> {
        let tables = self.tables()?;
        let found = match filter {
            UserFilter::Id(id) => tables.users.get(id),
            UserFilter::Token(token) => tables.users.values().find(|u| &u.token == token),
            UserFilter::Email(email) => tables.users.values().find(|u| &u.email == email),
        };
        found.cloned().ok_or(RepositoryError::NotFound)
    }

    async fn find_users(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.tables()?.users.values().cloned().collect())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables_mut()?;
        tables.check_user_unique(&user.email, &user.token, None)?;

        tables.last_user_id += 1;
        let user = user.into_user(tables.last_user_id, now_micros());
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut tables = self.tables_mut()?;
        if !tables.users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_user_unique(&user.email, &user.token, Some(user.id))?;

        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.email = user.email;
        stored.password_digest = user.password_digest;
        stored.token = user.token;
        stored.admin = user.admin;
        stored.updated_at = now_micros().max(stored.updated_at);
        Ok(stored.clone())
    }

    async fn delete_user(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.tables_mut()?;
        tables.users.remove(&user.id);
        tables.alerts.retain(|_, alert| alert.user_id != user.id);
        Ok(())
    }
}

#[async_trait]
impl AlertRepository for InMemoryDb {
    async fn find_alert(&self, filter: AlertFilter) -> Result<Alert, RepositoryError> {
        self.find_alerts(filter)
            .await?
            .into_iter()
            .next()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_alerts(&self, filter: AlertFilter) -> Result<Vec<Alert>, RepositoryError> {
        let tables = self.tables()?;
        let alerts = tables.alerts.values().filter(|alert| match filter {
            AlertFilter::Id(id) => alert.id == id,
            AlertFilter::UserId(user_id) => alert.user_id == user_id,
        });
        Ok(alerts.cloned().collect())
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<Alert, RepositoryError> {
        let mut tables = self.tables_mut()?;
        if !tables.users.contains_key(&alert.user_id) {
            return Err(RepositoryError::Constraint(
                "alerts_user_id_fkey".to_string(),
            ));
        }

        tables.last_alert_id += 1;
        let alert = alert.into_alert(tables.last_alert_id, now_micros());
        tables.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    async fn update_alert(&self, alert: Alert) -> Result<Alert, RepositoryError> {
        let mut tables = self.tables_mut()?;
        let stored = tables
            .alerts
            .get_mut(&alert.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.subject = alert.subject;
        stored.status = alert.status;
        stored.sent_at = alert.sent_at;
        stored.updated_at = now_micros().max(stored.updated_at);
        Ok(stored.clone())
    }

    async fn delete_alert(&self, alert: &Alert) -> Result<(), RepositoryError> {
        self.tables_mut()?.alerts.remove(&alert.id);
        Ok(())
    }
}
