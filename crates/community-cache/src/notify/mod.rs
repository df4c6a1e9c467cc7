//! Notification delivery over Redis Pub/Sub.

mod redis_sink;

pub use redis_sink::{RedisNotificationSink, NOTIFICATION_EVENT};
