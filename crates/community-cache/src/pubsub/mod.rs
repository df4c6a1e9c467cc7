//! Redis Pub/Sub module.
//!
//! Notifications fan out to one channel per recipient account.

mod channels;
mod publisher;

pub use channels::{PubSubChannel, ACCOUNT_CHANNEL_PREFIX};
pub use publisher::{PubSubEvent, Publisher};
