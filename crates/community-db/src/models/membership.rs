//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub group_id: i64,
    pub account_id: i64,
    pub is_approved: bool,
    pub is_suspended: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
