//! Event and RSVP database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct EventModel {
    pub id: i64,
    pub group_id: i64,
    pub host_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RsvpModel {
    pub event_id: i64,
    pub account_id: i64,
    pub response: String,
    pub responded_at: DateTime<Utc>,
}
