//! Event entities - scheduled group gatherings and member RSVPs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Snowflake,
    pub group_id: Snowflake,
    pub host_id: Snowflake,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Position of an event relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSchedule {
    Upcoming,
    Ongoing,
    Past,
}

impl Event {
    pub fn new(
        id: Snowflake,
        group_id: Snowflake,
        host_id: Snowflake,
        name: String,
        description: String,
        location: String,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        let slug = event_slug(&name, id);
        Self {
            id,
            group_id,
            host_id,
            name,
            slug,
            description,
            location,
            start_at,
            end_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Start must not be in the past and the event must end after it starts
    pub fn validate_times(
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if start_at < now {
            return Err(DomainError::ValidationError(
                "start_at must not be in the past".to_string(),
            ));
        }
        if end_at <= start_at {
            return Err(DomainError::ValidationError(
                "end_at must be after start_at".to_string(),
            ));
        }
        Ok(())
    }

    pub fn schedule(&self, now: DateTime<Utc>) -> EventSchedule {
        if now < self.start_at {
            EventSchedule::Upcoming
        } else if now > self.end_at {
            EventSchedule::Past
        } else {
            EventSchedule::Ongoing
        }
    }

    /// Ongoing events are locked against edits
    pub fn is_editable(&self, now: DateTime<Utc>) -> bool {
        self.schedule(now) != EventSchedule::Ongoing
    }

    pub fn rename(&mut self, name: String) {
        self.slug = event_slug(&name, self.id);
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_details(&mut self, description: Option<String>, location: Option<String>) {
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(location) = location {
            self.location = location;
        }
        self.updated_at = Utc::now();
    }

    pub fn reschedule(&mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) {
        self.start_at = start_at;
        self.end_at = end_at;
        self.updated_at = Utc::now();
    }
}

fn event_slug(name: &str, id: Snowflake) -> String {
    let base = slugify(name);
    if base.is_empty() {
        id.to_string()
    } else {
        format!("{base}-{id}")
    }
}

/// Lowercase ASCII slug; runs of anything else collapse into one `-`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsvpResponse {
    Yes,
    No,
    Maybe,
}

impl RsvpResponse {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            "maybe" => Some(Self::Maybe),
            _ => None,
        }
    }
}

/// A member's answer to an event invitation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rsvp {
    pub event_id: Snowflake,
    pub account_id: Snowflake,
    pub response: RsvpResponse,
    pub responded_at: DateTime<Utc>,
}

impl Rsvp {
    pub fn new(event_id: Snowflake, account_id: Snowflake, response: RsvpResponse) -> Self {
        Self {
            event_id,
            account_id,
            response,
            responded_at: Utc::now(),
        }
    }
}

/// Invitation summary for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RsvpSummary {
    pub yes: i64,
    pub no: i64,
    pub maybe: i64,
    pub total: i64,
    /// Invited members who have not answered yet
    pub pending: i64,
}

impl RsvpSummary {
    /// Count responses against the number of invited members
    pub fn tally(responses: impl IntoIterator<Item = RsvpResponse>, invited: i64) -> Self {
        let mut summary = Self::default();
        for response in responses {
            match response {
                RsvpResponse::Yes => summary.yes += 1,
                RsvpResponse::No => summary.no += 1,
                RsvpResponse::Maybe => summary.maybe += 1,
            }
            summary.total += 1;
        }
        summary.pending = (invited - summary.total).max(0);
        summary
    }
}
