//! Poll, choice and vote database models

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PollModel {
    pub id: i64,
    pub group_id: i64,
    pub author_id: i64,
    pub question: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ChoiceModel {
    pub id: i64,
    pub poll_id: i64,
    pub text: String,
    pub position: i32,
    pub votes: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct VoteModel {
    pub poll_id: i64,
    pub voter_id: i64,
    pub choice_id: i64,
    pub created_at: DateTime<Utc>,
}
