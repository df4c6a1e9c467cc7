//! Notification tuple - (sender, recipients, verb, target, description)
//!
//! Services build one of these after a successful state change and hand it
//! to the [`NotificationSink`](crate::traits::NotificationSink). Delivery and
//! storage are somebody else's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ContentKind, Snowflake};

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum NotificationTarget {
    Account(Snowflake),
    Group(Snowflake),
    Post(Snowflake),
    Comment(Snowflake),
    Reply(Snowflake),
    Poll(Snowflake),
    Event(Snowflake),
}

impl NotificationTarget {
    pub fn content(kind: ContentKind, id: Snowflake) -> Self {
        match kind {
            ContentKind::Post => Self::Post(id),
            ContentKind::Comment => Self::Comment(id),
            ContentKind::Reply => Self::Reply(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub sender: Snowflake,
    pub recipients: Vec<Snowflake>,
    pub verb: String,
    pub target: NotificationTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(sender: Snowflake, verb: impl Into<String>, target: NotificationTarget) -> Self {
        Self {
            sender,
            recipients: Vec::new(),
            verb: verb.into(),
            target,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn to(mut self, recipient: Snowflake) -> Self {
        if !self.recipients.contains(&recipient) {
            self.recipients.push(recipient);
        }
        self
    }

    pub fn to_all(self, recipients: impl IntoIterator<Item = Snowflake>) -> Self {
        recipients.into_iter().fold(self, Self::to)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Drop the sender from the recipient list (no self-notifications)
    pub fn excluding_sender(mut self) -> Self {
        let sender = self.sender;
        self.recipients.retain(|id| *id != sender);
        self
    }

    #[inline]
    pub fn has_recipients(&self) -> bool {
        !self.recipients.is_empty()
    }
}
