//! Refresh token storage in Redis.
//!
//! Each issued refresh token is stored under its `jti` with the token's
//! lifetime as TTL. A token is only accepted while its entry exists, so
//! revoking the entry logs the session out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use community_core::error::DomainError;
use community_core::traits::RefreshSessions;
use community_core::value_objects::Snowflake;

use crate::pool::RedisPool;

const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";
const ACCOUNT_TOKENS_PREFIX: &str = "account_tokens:";

/// Default TTL for refresh tokens (7 days)
const DEFAULT_REFRESH_TOKEN_TTL: u64 = 7 * 24 * 60 * 60;

/// Stored refresh token data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenData {
    pub account_id: Snowflake,
    /// Unix epoch seconds
    pub created_at: i64,
}

impl RefreshTokenData {
    #[must_use]
    pub fn new(account_id: Snowflake) -> Self {
        Self {
            account_id,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct RefreshTokenStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RefreshTokenStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl_seconds: DEFAULT_REFRESH_TOKEN_TTL,
        }
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(token_id: &str) -> String {
        format!("{REFRESH_TOKEN_PREFIX}{token_id}")
    }

    fn account_key(account_id: Snowflake) -> String {
        format!("{ACCOUNT_TOKENS_PREFIX}{account_id}")
    }
}

#[async_trait]
impl RefreshSessions for RefreshTokenStore {
    async fn store(&self, jti: &str, account_id: Snowflake) -> Result<(), DomainError> {
        let data = RefreshTokenData::new(account_id);
        self.pool.set(&Self::key(jti), &data, self.ttl_seconds).await?;

        // Track the token under its account for logout-everywhere
        self.pool
            .add_member(&Self::account_key(account_id), jti, self.ttl_seconds)
            .await?;

        tracing::debug!(account_id = %account_id, "Stored refresh token");
        Ok(())
    }

    async fn revoke(&self, jti: &str) -> Result<Option<Snowflake>, DomainError> {
        let Some(data) = self.pool.take::<RefreshTokenData>(&Self::key(jti)).await? else {
            return Ok(None);
        };

        self.pool
            .remove_member(&Self::account_key(data.account_id), jti)
            .await?;

        tracing::debug!(account_id = %data.account_id, "Revoked refresh token");
        Ok(Some(data.account_id))
    }

    async fn revoke_all(&self, account_id: Snowflake) -> Result<u32, DomainError> {
        let account_key = Self::account_key(account_id);
        let token_ids = self.pool.members(&account_key).await?;

        let keys: Vec<String> = token_ids.iter().map(|id| Self::key(id)).collect();
        let revoked = self.pool.delete_many(&keys).await?;
        self.pool.delete(&account_key).await?;

        tracing::info!(account_id = %account_id, count = revoked, "Revoked all refresh tokens");
        Ok(u32::try_from(revoked).unwrap_or(0))
    }
}
