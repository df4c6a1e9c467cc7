//! PostgreSQL implementation of GroupRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use community_core::entities::{Group, GroupAdmins, MAX_GROUP_ADMINS};
use community_core::error::DomainError;
use community_core::traits::{GroupRepository, Page, RepoResult};
use community_core::value_objects::Snowflake;

use crate::models::GroupModel;

use super::error::{map_db_error, map_unique_violation};

#[derive(Clone)]
pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `%query%` with LIKE wildcards escaped
fn like_pattern(query: Option<&str>) -> Option<String> {
    query.map(str::trim).filter(|q| !q.is_empty()).map(|q| {
        let escaped = q
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{escaped}%")
    })
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>> {
        let result = sqlx::query_as::<_, GroupModel>(
            r"
            SELECT id, name, description, privacy, owner_id, created_at, updated_at
            FROM groups
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Group::from))
    }

    #[instrument(skip(self))]
    async fn search(&self, query: Option<&str>, page: Page) -> RepoResult<Vec<Group>> {
        let results = sqlx::query_as::<_, GroupModel>(
            r"
            SELECT id, name, description, privacy, owner_id, created_at, updated_at
            FROM groups
            WHERE $1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(like_pattern(query))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Group::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_search(&self, query: Option<&str>) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM groups
            WHERE $1::TEXT IS NULL OR name ILIKE $1 OR description ILIKE $1
            ",
        )
        .bind(like_pattern(query))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, account_id: Snowflake) -> RepoResult<Vec<Group>> {
        let results = sqlx::query_as::<_, GroupModel>(
            r"
            SELECT g.id, g.name, g.description, g.privacy, g.owner_id, g.created_at, g.updated_at
            FROM groups g
            INNER JOIN memberships m ON m.group_id = g.id
            WHERE m.account_id = $1 AND m.is_approved = TRUE
            ORDER BY g.name
            ",
        )
        .bind(account_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Group::from).collect())
    }

    #[instrument(skip(self, group), fields(group_id = %group.id))]
    async fn create(&self, group: &Group) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO groups (id, name, description, privacy, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(group.id.into_inner())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.privacy.as_str())
        .bind(group.owner_id.into_inner())
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("INSERT INTO group_admins (group_id, account_id) VALUES ($1, $2)")
            .bind(group.id.into_inner())
            .bind(group.owner_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO memberships (group_id, account_id, is_approved, is_suspended, joined_at, updated_at)
            VALUES ($1, $2, TRUE, FALSE, $3, $3)
            ",
        )
        .bind(group.id.into_inner())
        .bind(group.owner_id.into_inner())
        .bind(group.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, group), fields(group_id = %group.id))]
    async fn update(&self, group: &Group) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE groups
            SET name = $2, description = $3, privacy = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(group.id.into_inner())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.privacy.as_str())
        .bind(group.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GroupNotFound(group.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GroupNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn admins(&self, group_id: Snowflake) -> RepoResult<GroupAdmins> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT account_id FROM group_admins WHERE group_id = $1 ORDER BY added_at, account_id",
        )
        .bind(group_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(GroupAdmins::new(ids.into_iter().map(Snowflake::new).collect()))
    }

    #[instrument(skip(self))]
    async fn add_admin(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Serializes concurrent promotions within one group
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM groups WHERE id = $1 FOR UPDATE")
            .bind(group_id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if locked.is_none() {
            return Err(DomainError::GroupNotFound(group_id));
        }

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM group_admins WHERE group_id = $1")
                .bind(group_id.into_inner())
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?;
        if count >= MAX_GROUP_ADMINS as i64 {
            return Err(DomainError::AdminCapacityExceeded);
        }

        sqlx::query("INSERT INTO group_admins (group_id, account_id) VALUES ($1, $2)")
            .bind(group_id.into_inner())
            .bind(account_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::AlreadyAdmin))?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_admin(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM group_admins WHERE group_id = $1 AND account_id = $2")
            .bind(group_id.into_inner())
            .bind(account_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn member_count(&self, group_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*) FROM memberships
            WHERE group_id = $1 AND is_approved = TRUE AND is_suspended = FALSE
            ",
        )
        .bind(group_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
