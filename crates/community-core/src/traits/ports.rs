//! Non-storage ports: notification delivery, token storage and the wall clock

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DomainError;
use crate::events::Notification;
use crate::value_objects::Snowflake;

/// Outbound channel for notifications.
///
/// Callers treat dispatch as fire-and-forget: a failure is logged and the
/// request that triggered it still succeeds.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn dispatch(&self, notification: &Notification) -> Result<(), DomainError>;
}

/// Single-use account activation tokens
#[async_trait]
pub trait ActivationTokens: Send + Sync {
    /// Issue a fresh token for the account
    async fn issue(&self, account_id: Snowflake) -> Result<String, DomainError>;

    /// Consume a token. Unknown, expired and already used tokens yield `None`
    async fn consume(&self, token: &str) -> Result<Option<Snowflake>, DomainError>;
}

/// Live refresh-token sessions, keyed by the token's `jti`
#[async_trait]
pub trait RefreshSessions: Send + Sync {
    async fn store(&self, jti: &str, account_id: Snowflake) -> Result<(), DomainError>;

    /// Remove the session and return its owner, `None` if it was not live
    async fn revoke(&self, jti: &str) -> Result<Option<Snowflake>, DomainError>;

    /// Remove every session of the account, returning how many there were
    async fn revoke_all(&self, account_id: Snowflake) -> Result<u32, DomainError>;
}

/// Source of "now" for time-window checks
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// [`Clock`] backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
