//! Access service
//!
//! Answers "who may do what" inside a group: admin checks, membership
//! standing and read access. Every check fails with the matching domain
//! error and never mutates anything.

use community_core::entities::{Group, GroupAdmins, Membership};
use community_core::{DomainError, Snowflake, Visibility};
use tracing::{debug, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Access control for group-scoped operations
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    /// Create a new AccessService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a group or fail with `GroupNotFound`
    #[instrument(skip(self))]
    pub async fn load_group(&self, group_id: Snowflake) -> ServiceResult<Group> {
        let group = self
            .ctx
            .group_repo()
            .find_by_id(group_id)
            .await?
            .ok_or(DomainError::GroupNotFound(group_id))?;
        Ok(group)
    }

    pub async fn membership(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<Option<Membership>> {
        Ok(self.ctx.membership_repo().find(group_id, account_id).await?)
    }

    pub async fn is_admin(&self, group_id: Snowflake, account_id: Snowflake) -> ServiceResult<bool> {
        Ok(self.ctx.group_repo().admins(group_id).await?.contains(account_id))
    }

    /// Require the account to be in the group's admin set.
    ///
    /// Returns the admin set so callers can run further checks on it.
    #[instrument(skip(self))]
    pub async fn require_admin(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<GroupAdmins> {
        let admins = self.ctx.group_repo().admins(group_id).await?;
        if !admins.contains(account_id) {
            debug!(group_id = %group_id, account_id = %account_id, "Admin check failed");
            return Err(DomainError::NotGroupAdmin.into());
        }
        Ok(admins)
    }

    /// Require an approved membership. Suspended members pass.
    #[instrument(skip(self))]
    pub async fn require_member(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<Membership> {
        match self.membership(group_id, account_id).await? {
            Some(membership) if membership.is_approved => Ok(membership),
            _ => Err(DomainError::NotGroupMember.into()),
        }
    }

    /// Require an approved, non-suspended membership
    #[instrument(skip(self))]
    pub async fn require_active_member(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<Membership> {
        let membership = self.require_member(group_id, account_id).await?;
        if membership.is_suspended {
            return Err(DomainError::MemberSuspended.into());
        }
        Ok(membership)
    }

    /// Public groups are readable by anyone signed in; private groups only
    /// by approved members
    pub async fn require_reader(&self, group: &Group, account_id: Snowflake) -> ServiceResult<()> {
        if group.is_private() {
            self.require_member(group.id, account_id).await?;
        }
        Ok(())
    }

    /// Anything other than [`Visibility::Shown`] is reserved for admins
    pub async fn require_visibility(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
        visibility: Visibility,
    ) -> ServiceResult<()> {
        if visibility.is_privileged() {
            self.require_admin(group_id, account_id).await?;
        }
        Ok(())
    }
}
