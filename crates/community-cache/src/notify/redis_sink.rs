//! [`NotificationSink`] that publishes one event per recipient to the
//! recipient's `account:{id}` channel. Whoever subscribes there (mailer,
//! push gateway, in-app inbox) owns storage and delivery.

use async_trait::async_trait;
use futures::future::join_all;

use community_core::error::DomainError;
use community_core::events::Notification;
use community_core::traits::NotificationSink;

use crate::pubsub::{PubSubChannel, PubSubEvent, Publisher};

pub const NOTIFICATION_EVENT: &str = "NOTIFICATION";

#[derive(Clone)]
pub struct RedisNotificationSink {
    publisher: Publisher,
}

impl RedisNotificationSink {
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

#[async_trait]
impl NotificationSink for RedisNotificationSink {
    async fn dispatch(&self, notification: &Notification) -> Result<(), DomainError> {
        if !notification.has_recipients() {
            return Ok(());
        }

        let data = serde_json::to_value(notification)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let event = PubSubEvent::new(NOTIFICATION_EVENT, data);

        let channels: Vec<PubSubChannel> = notification
            .recipients
            .iter()
            .map(|&id| PubSubChannel::account(id))
            .collect();
        let results = join_all(
            channels
                .iter()
                .map(|channel| self.publisher.publish(channel, &event)),
        )
        .await;

        let mut failures = results.into_iter().filter_map(Result::err);
        match failures.next() {
            None => {
                tracing::debug!(
                    verb = %notification.verb,
                    recipients = notification.recipients.len(),
                    "Notification published"
                );
                Ok(())
            }
            Some(first) => {
                let failed = 1 + failures.count();
                tracing::warn!(
                    verb = %notification.verb,
                    failed = failed,
                    error = %first,
                    "Notification publish failed"
                );
                Err(first.into())
            }
        }
    }
}
