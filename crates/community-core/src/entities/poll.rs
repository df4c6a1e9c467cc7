//! Poll entities - a dated question with ordered choices and a vote ledger

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Poll owned by a group.
///
/// The voting window is inclusive on both ends and measured in whole days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub id: Snowflake,
    pub group_id: Snowflake,
    pub author_id: Snowflake,
    pub question: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where `today` falls relative to a poll's window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollStatus {
    Upcoming,
    Open,
    Closed,
}

impl Poll {
    pub fn new(
        id: Snowflake,
        group_id: Snowflake,
        author_id: Snowflake,
        question: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            group_id,
            author_id,
            question,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate_window(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), DomainError> {
        if end_date < start_date {
            return Err(DomainError::ValidationError(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(())
    }

    pub fn status(&self, today: NaiveDate) -> PollStatus {
        if today < self.start_date {
            PollStatus::Upcoming
        } else if today > self.end_date {
            PollStatus::Closed
        } else {
            PollStatus::Open
        }
    }

    /// Fail with the matching domain error unless voting is open on `today`
    pub fn ensure_open(&self, today: NaiveDate) -> Result<(), DomainError> {
        match self.status(today) {
            PollStatus::Upcoming => Err(DomainError::VotingNotOpen {
                opens: self.start_date,
            }),
            PollStatus::Closed => Err(DomainError::VotingClosed {
                closed: self.end_date,
            }),
            PollStatus::Open => Ok(()),
        }
    }

    pub fn reschedule(&mut self, question: String, start_date: NaiveDate, end_date: NaiveDate) {
        self.question = question;
        self.start_date = start_date;
        self.end_date = end_date;
        self.updated_at = Utc::now();
    }
}

/// One option of a poll with its running counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: Snowflake,
    pub poll_id: Snowflake,
    pub text: String,
    pub position: i32,
    pub votes: i64,
}

impl Choice {
    pub fn new(id: Snowflake, poll_id: Snowflake, text: String, position: i32) -> Self {
        Self {
            id,
            poll_id,
            text,
            position,
            votes: 0,
        }
    }
}

/// Ledger row: at most one per (poll, voter)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub poll_id: Snowflake,
    pub voter_id: Snowflake,
    pub choice_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(poll_id: Snowflake, voter_id: Snowflake, choice_id: Snowflake) -> Self {
        Self {
            poll_id,
            voter_id,
            choice_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january_poll() -> Poll {
        Poll::new(
            Snowflake::new(1),
            Snowflake::new(2),
            Snowflake::new(3),
            "Best crab?".to_string(),
            date(2024, 1, 1),
            date(2024, 1, 31),
        )
    }

    #[test]
    fn test_status_is_inclusive_on_both_ends() {
        let poll = january_poll();
        assert_eq!(poll.status(date(2023, 12, 31)), PollStatus::Upcoming);
        assert_eq!(poll.status(date(2024, 1, 1)), PollStatus::Open);
        assert_eq!(poll.status(date(2024, 1, 15)), PollStatus::Open);
        assert_eq!(poll.status(date(2024, 1, 31)), PollStatus::Open);
        assert_eq!(poll.status(date(2024, 2, 1)), PollStatus::Closed);
    }

    #[test]
    fn test_ensure_open_errors() {
        let poll = january_poll();
        assert!(matches!(
            poll.ensure_open(date(2023, 12, 31)),
            Err(DomainError::VotingNotOpen { .. })
        ));
        assert!(matches!(
            poll.ensure_open(date(2024, 2, 1)),
            Err(DomainError::VotingClosed { .. })
        ));
        assert!(poll.ensure_open(date(2024, 1, 15)).is_ok());
    }

    #[test]
    fn test_validate_window() {
        assert!(Poll::validate_window(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(Poll::validate_window(date(2024, 1, 2), date(2024, 1, 1)).is_err());
    }
}
