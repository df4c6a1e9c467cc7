//! Membership service
//!
//! The join/approve/suspend state machine and the group's admin set.
//!
//! A membership moves `none -> pending -> approved` (public groups skip
//! `pending`) and independently `approved <-> suspended`. Leaving, removal
//! and rejection delete the row. The owner can never be suspended, removed
//! or demoted, and every refused transition leaves storage untouched.

use community_core::entities::{Group, MemberFilter, Membership};
use community_core::events::{Notification, NotificationTarget};
use community_core::traits::Page;
use community_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{AccountResponse, AdminsResponse, MemberResponse, MembershipResponse};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct MembershipService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MembershipService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn access(&self) -> AccessService<'a> {
        AccessService::new(self.ctx)
    }

    async fn find_membership(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<Membership> {
        let membership = self
            .ctx
            .membership_repo()
            .find(group_id, account_id)
            .await?
            .ok_or(DomainError::MembershipNotFound)?;
        Ok(membership)
    }

    /// Request to join. Public groups approve at once; private groups leave
    /// the request pending and notify every admin.
    #[instrument(skip(self))]
    pub async fn join(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let group = self.access().load_group(group_id).await?;

        let membership = Membership::request(group_id, actor_id, group.privacy);
        self.ctx.membership_repo().create(&membership).await?;

        if membership.is_approved {
            info!(group_id = %group_id, account_id = %actor_id, "Joined group");
            self.ctx
                .notify(
                    Notification::new(
                        actor_id,
                        format!("joined {}", group.name),
                        NotificationTarget::Group(group_id),
                    )
                    .to(actor_id),
                )
                .await;
        } else {
            info!(group_id = %group_id, account_id = %actor_id, "Join requested");
            let admins = self.ctx.group_repo().admins(group_id).await?;
            self.ctx
                .notify(
                    Notification::new(
                        actor_id,
                        format!("requested to join {}", group.name),
                        NotificationTarget::Group(group_id),
                    )
                    .to_all(admins.into_ids())
                    .with_description("join request")
                    .excluding_sender(),
                )
                .await;
        }

        Ok(MembershipResponse::from(&membership))
    }

    /// Approve a pending request. Admins only.
    #[instrument(skip(self))]
    pub async fn approve(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let group = self.access().load_group(group_id).await?;
        self.access().require_admin(group_id, actor_id).await?;

        let mut membership = self.find_membership(group_id, account_id).await?;
        if !membership.is_pending() {
            return Err(DomainError::MembershipNotFound.into());
        }

        membership.approve();
        self.ctx.membership_repo().update(&membership).await?;

        info!(group_id = %group_id, account_id = %account_id, "Join request approved");

        self.ctx
            .notify(
                Notification::new(
                    actor_id,
                    format!("Your request to join {} has been approved", group.name),
                    NotificationTarget::Group(group_id),
                )
                .to(account_id),
            )
            .await;

        Ok(MembershipResponse::from(&membership))
    }

    /// Reject a pending request. Admins may reject anyone's request; the
    /// requester may withdraw their own.
    #[instrument(skip(self))]
    pub async fn reject(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<()> {
        let group = self.access().load_group(group_id).await?;
        if actor_id != account_id {
            self.access().require_admin(group_id, actor_id).await?;
        }

        let membership = self.find_membership(group_id, account_id).await?;
        if !membership.is_pending() {
            return Err(DomainError::MembershipNotFound.into());
        }

        self.ctx.membership_repo().delete(group_id, account_id).await?;

        info!(group_id = %group_id, account_id = %account_id, "Join request rejected");

        self.ctx
            .notify(
                Notification::new(
                    actor_id,
                    format!("Your request to join {} has been rejected", group.name),
                    NotificationTarget::Group(group_id),
                )
                .to(account_id)
                .excluding_sender(),
            )
            .await;

        Ok(())
    }

    /// Leave a group
    #[instrument(skip(self))]
    pub async fn leave(&self, group_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let group = self.access().load_group(group_id).await?;
        self.ensure_removable(&group, actor_id).await?;

        self.ctx.membership_repo().delete(group_id, actor_id).await?;

        info!(group_id = %group_id, account_id = %actor_id, "Left group");

        Ok(())
    }

    /// Remove a member. Admins only.
    #[instrument(skip(self))]
    pub async fn remove(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<()> {
        let group = self.access().load_group(group_id).await?;
        self.access().require_admin(group_id, actor_id).await?;
        self.ensure_removable(&group, account_id).await?;

        self.ctx.membership_repo().delete(group_id, account_id).await?;

        info!(group_id = %group_id, account_id = %account_id, actor_id = %actor_id, "Member removed");

        self.ctx
            .notify(
                Notification::new(
                    actor_id,
                    format!("You have been removed from {}", group.name),
                    NotificationTarget::Group(group_id),
                )
                .to(account_id),
            )
            .await;

        Ok(())
    }

    /// Owner and sole admin stay; the membership must exist
    async fn ensure_removable(&self, group: &Group, account_id: Snowflake) -> ServiceResult<()> {
        if group.is_owner(account_id) {
            return Err(DomainError::OwnerProtected { action: "remove" }.into());
        }
        self.find_membership(group.id, account_id).await?;

        let admins = self.ctx.group_repo().admins(group.id).await?;
        if admins.is_sole_admin(account_id) {
            return Err(DomainError::LastAdmin.into());
        }
        Ok(())
    }

    /// Suspend an approved member, or lift their suspension. Admins only.
    ///
    /// Suspending an admin also takes away their admin seat.
    #[instrument(skip(self))]
    pub async fn toggle_suspension(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<MembershipResponse> {
        let group = self.access().load_group(group_id).await?;
        self.access().require_admin(group_id, actor_id).await?;

        if group.is_owner(account_id) {
            return Err(DomainError::OwnerProtected { action: "suspend" }.into());
        }

        let mut membership = self.find_membership(group_id, account_id).await?;
        if membership.is_pending() {
            return Err(DomainError::MembershipNotFound.into());
        }

        let suspended = membership.toggle_suspension();
        let demoted = self.ctx.membership_repo().set_suspension(&membership).await?;

        let verb = if suspended {
            if demoted {
                info!(group_id = %group_id, account_id = %account_id, "Suspended admin demoted");
            }
            info!(group_id = %group_id, account_id = %account_id, "Member suspended");
            format!("You have been suspended from {}", group.name)
        } else {
            info!(group_id = %group_id, account_id = %account_id, "Suspension lifted");
            format!("Your suspension in {} has been lifted", group.name)
        };

        self.ctx
            .notify(
                Notification::new(actor_id, verb, NotificationTarget::Group(group_id))
                    .to(account_id),
            )
            .await;

        Ok(MembershipResponse::from(&membership))
    }

    /// Promote an active member to admin. Admins only.
    #[instrument(skip(self))]
    pub async fn add_admin(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<AdminsResponse> {
        let group = self.access().load_group(group_id).await?;
        let admins = self.access().require_admin(group_id, actor_id).await?;
        self.access().require_active_member(group_id, account_id).await?;

        if admins.contains(account_id) {
            return Err(DomainError::AlreadyAdmin.into());
        }

        // capacity is checked again under the group row lock
        self.ctx.group_repo().add_admin(group_id, account_id).await?;

        info!(group_id = %group_id, account_id = %account_id, "Admin added");

        self.ctx
            .notify(
                Notification::new(
                    actor_id,
                    format!("made you an admin of {}", group.name),
                    NotificationTarget::Group(group_id),
                )
                .to(account_id)
                .excluding_sender(),
            )
            .await;

        self.admins(group_id).await
    }

    /// Demote an admin. Admins only; the owner cannot be demoted.
    #[instrument(skip(self))]
    pub async fn remove_admin(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        account_id: Snowflake,
    ) -> ServiceResult<AdminsResponse> {
        let group = self.access().load_group(group_id).await?;
        self.access().require_admin(group_id, actor_id).await?;

        if group.is_owner(account_id) {
            return Err(DomainError::OwnerProtected { action: "demote" }.into());
        }

        if !self.ctx.group_repo().remove_admin(group_id, account_id).await? {
            return Err(ServiceError::not_found("Admin", account_id.to_string()));
        }

        info!(group_id = %group_id, account_id = %account_id, "Admin removed");

        self.admins(group_id).await
    }

    async fn admins(&self, group_id: Snowflake) -> ServiceResult<AdminsResponse> {
        let admins = self.ctx.group_repo().admins(group_id).await?;
        Ok(AdminsResponse {
            group_id: group_id.to_string(),
            admin_ids: admins.ids().iter().map(ToString::to_string).collect(),
        })
    }

    /// Members matching `filter`. Pending requests are visible to admins
    /// only; other listings follow the group's read access.
    #[instrument(skip(self))]
    pub async fn list_members(
        &self,
        group_id: Snowflake,
        viewer_id: Snowflake,
        filter: MemberFilter,
        page: Page,
    ) -> ServiceResult<Vec<MemberResponse>> {
        let group = self.access().load_group(group_id).await?;
        if filter == MemberFilter::Pending {
            self.access().require_admin(group_id, viewer_id).await?;
        } else {
            self.access().require_reader(&group, viewer_id).await?;
        }

        let memberships = self.ctx.membership_repo().list(group_id, filter, page).await?;
        let account_ids: Vec<Snowflake> = memberships.iter().map(|m| m.account_id).collect();
        let accounts = self.ctx.account_repo().find_many(&account_ids).await?;
        let admins = self.ctx.group_repo().admins(group_id).await?;

        Ok(memberships
            .iter()
            .map(|membership| MemberResponse {
                membership: MembershipResponse::from(membership),
                account: accounts
                    .iter()
                    .find(|a| a.id == membership.account_id)
                    .map(AccountResponse::from),
                is_admin: admins.contains(membership.account_id),
            })
            .collect())
    }
}
