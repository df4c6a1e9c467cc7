//! Pub/Sub channel naming.

use community_core::Snowflake;

/// Channel prefix for account-specific events
pub const ACCOUNT_CHANNEL_PREFIX: &str = "account:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Events for one account
    Account(Snowflake),
}

impl PubSubChannel {
    #[must_use]
    pub fn account(account_id: Snowflake) -> Self {
        Self::Account(account_id)
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Account(id) => format!("{ACCOUNT_CHANNEL_PREFIX}{id}"),
        }
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
