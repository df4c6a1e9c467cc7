//! Single-use activation tokens.

use async_trait::async_trait;
use uuid::Uuid;

use community_core::error::DomainError;
use community_core::traits::ActivationTokens;
use community_core::value_objects::Snowflake;

use crate::pool::RedisPool;

const ACTIVATION_TOKEN_PREFIX: &str = "activation_token:";

/// Default TTL for activation tokens (3 days)
const DEFAULT_ACTIVATION_TOKEN_TTL: u64 = 3 * 24 * 60 * 60;

#[derive(Clone)]
pub struct ActivationTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl ActivationTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: DEFAULT_ACTIVATION_TOKEN_TTL,
        }
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token: &str) -> String {
        format!("{ACTIVATION_TOKEN_PREFIX}{token}")
    }
}

#[async_trait]
impl ActivationTokens for ActivationTokenStore {
    async fn issue(&self, account_id: Snowflake) -> Result<String, DomainError> {
        let token = Uuid::new_v4().simple().to_string();
        self.pool
            .set(&Self::key(&token), &account_id, self.ttl_seconds)
            .await?;

        tracing::debug!(account_id = %account_id, "Issued activation token");
        Ok(token)
    }

    async fn consume(&self, token: &str) -> Result<Option<Snowflake>, DomainError> {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(None);
        }
        Ok(self.pool.take(&Self::key(token)).await?)
    }
}
