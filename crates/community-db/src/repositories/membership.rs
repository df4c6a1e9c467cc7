//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use community_core::entities::{MemberFilter, Membership};
use community_core::error::DomainError;
use community_core::traits::{MembershipRepository, Page, RepoResult};
use community_core::value_objects::Snowflake;

use crate::models::MembershipModel;

use super::error::{is_foreign_key_violation, map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        let result = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT group_id, account_id, is_approved, is_suspended, joined_at, updated_at
            FROM memberships
            WHERE group_id = $1 AND account_id = $2
            ",
        )
        .bind(group_id.into_inner())
        .bind(account_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Membership::from))
    }

    #[instrument(skip(self, membership), fields(group_id = %membership.group_id, account_id = %membership.account_id))]
    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO memberships (group_id, account_id, is_approved, is_suspended, joined_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(membership.group_id.into_inner())
        .bind(membership.account_id.into_inner())
        .bind(membership.is_approved)
        .bind(membership.is_suspended)
        .bind(membership.joined_at)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::GroupNotFound(membership.group_id)
            } else {
                map_unique_violation(e, || DomainError::AlreadyMember)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self, membership), fields(group_id = %membership.group_id, account_id = %membership.account_id))]
    async fn update(&self, membership: &Membership) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE memberships
            SET is_approved = $3, is_suspended = $4, updated_at = $5
            WHERE group_id = $1 AND account_id = $2
            ",
        )
        .bind(membership.group_id.into_inner())
        .bind(membership.account_id.into_inner())
        .bind(membership.is_approved)
        .bind(membership.is_suspended)
        .bind(membership.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MembershipNotFound);
        }
        Ok(())
    }

    #[instrument(skip(self, membership), fields(group_id = %membership.group_id, account_id = %membership.account_id))]
    async fn set_suspension(&self, membership: &Membership) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r"
            UPDATE memberships
            SET is_suspended = $3, updated_at = $4
            WHERE group_id = $1 AND account_id = $2
            ",
        )
        .bind(membership.group_id.into_inner())
        .bind(membership.account_id.into_inner())
        .bind(membership.is_suspended)
        .bind(membership.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MembershipNotFound);
        }

        let mut demoted = false;
        if membership.is_suspended {
            let result =
                sqlx::query("DELETE FROM group_admins WHERE group_id = $1 AND account_id = $2")
                    .bind(membership.group_id.into_inner())
                    .bind(membership.account_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;
            demoted = result.rows_affected() > 0;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(demoted)
    }

    #[instrument(skip(self))]
    async fn delete(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM memberships WHERE group_id = $1 AND account_id = $2")
            .bind(group_id.into_inner())
            .bind(account_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MembershipNotFound);
        }

        sqlx::query("DELETE FROM group_admins WHERE group_id = $1 AND account_id = $2")
            .bind(group_id.into_inner())
            .bind(account_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        group_id: Snowflake,
        filter: MemberFilter,
        page: Page,
    ) -> RepoResult<Vec<Membership>> {
        let (approved, suspended) = filter.flags();

        let results = sqlx::query_as::<_, MembershipModel>(
            r"
            SELECT group_id, account_id, is_approved, is_suspended, joined_at, updated_at
            FROM memberships
            WHERE group_id = $1
              AND is_approved = $2
              AND ($3::BOOLEAN IS NULL OR is_suspended = $3)
            ORDER BY joined_at, account_id
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(group_id.into_inner())
        .bind(approved)
        .bind(suspended)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Membership::from).collect())
    }
}
