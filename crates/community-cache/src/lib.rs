//! # community-cache
//!
//! Redis layer for short-lived tokens and notification fan-out.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Token Storage**: Single-use activation tokens and refresh-token sessions
//! - **Pub/Sub**: Per-account channels that notifications are published to
//!
//! ## Example
//!
//! ```ignore
//! use community_cache::{Publisher, RedisNotificationSink, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let sink = RedisNotificationSink::new(Publisher::new(pool.clone()));
//!
//! let notification = Notification::new(actor, "joined", NotificationTarget::Group(group_id))
//!     .to(actor);
//! sink.dispatch(&notification).await?;
//! ```

pub mod notify;
pub mod pool;
pub mod pubsub;
pub mod session;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export session types
pub use session::{ActivationTokenStore, RefreshTokenData, RefreshTokenStore};

// Re-export pubsub types
pub use pubsub::{PubSubChannel, PubSubEvent, Publisher, ACCOUNT_CHANNEL_PREFIX};

pub use notify::{RedisNotificationSink, NOTIFICATION_EVENT};
