//! Group service
//!
//! Handles group creation, management, and search.

use community_core::entities::Group;
use community_core::traits::Page;
use community_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CreateGroupRequest, GroupDetailResponse, GroupResponse, PaginatedResponse, UpdateGroupRequest,
};

use super::access::AccessService;
use super::auth::non_empty;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Group service
pub struct GroupService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GroupService<'a> {
    /// Create a new GroupService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a group owned by `owner_id`, who also becomes its first
    /// admin and an approved member
    #[instrument(skip(self, request))]
    pub async fn create_group(
        &self,
        owner_id: Snowflake,
        request: CreateGroupRequest,
    ) -> ServiceResult<GroupResponse> {
        let mut group = Group::new(
            self.ctx.generate_id(),
            request.name.trim().to_string(),
            request.privacy,
            owner_id,
        );
        group.description = non_empty(request.description);

        self.ctx.group_repo().create(&group).await?;

        info!(group_id = %group.id, owner_id = %owner_id, "Group created");

        Ok(GroupResponse::from(&group))
    }

    /// Group with member count, admin ids and the viewer's own standing
    #[instrument(skip(self))]
    pub async fn get_group(
        &self,
        group_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<GroupDetailResponse> {
        let access = AccessService::new(self.ctx);
        let group = access.load_group(group_id).await?;

        let member_count = self.ctx.group_repo().member_count(group_id).await?;
        let admins = self.ctx.group_repo().admins(group_id).await?;
        let membership = access.membership(group_id, viewer_id).await?;

        Ok(GroupDetailResponse {
            group: GroupResponse::from(&group),
            member_count,
            is_admin: admins.contains(viewer_id),
            admin_ids: admins.ids().iter().map(ToString::to_string).collect(),
            membership: membership.map(|m| m.state()),
        })
    }

    /// Case-insensitive search over name and description, newest first
    #[instrument(skip(self))]
    pub async fn search_groups(
        &self,
        query: Option<&str>,
        page: i64,
        per_page: i64,
    ) -> ServiceResult<PaginatedResponse<GroupResponse>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let window = Page::new(page, per_page);

        let groups = self.ctx.group_repo().search(query, window).await?;
        let total = self.ctx.group_repo().count_search(query).await?;

        Ok(PaginatedResponse::new(
            groups.iter().map(GroupResponse::from).collect(),
            page.max(1),
            window.limit,
            total,
        ))
    }

    /// Update name, description or privacy. Admins only.
    #[instrument(skip(self, request))]
    pub async fn update_group(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateGroupRequest,
    ) -> ServiceResult<GroupResponse> {
        let access = AccessService::new(self.ctx);
        let mut group = access.load_group(group_id).await?;
        access.require_admin(group_id, actor_id).await?;

        let mut changed = false;

        if let Some(name) = request.name {
            group.set_name(name.trim().to_string());
            changed = true;
        }

        if let Some(description) = request.description {
            group.set_description(non_empty(Some(description)));
            changed = true;
        }

        if let Some(privacy) = request.privacy {
            group.set_privacy(privacy);
            changed = true;
        }

        if changed {
            self.ctx.group_repo().update(&group).await?;
            info!(group_id = %group_id, actor_id = %actor_id, "Group updated");
        }

        Ok(GroupResponse::from(&group))
    }

    /// Delete a group with everything in it. Owner only.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let group = AccessService::new(self.ctx).load_group(group_id).await?;
        if !group.is_owner(actor_id) {
            return Err(DomainError::NotGroupOwner.into());
        }

        self.ctx.group_repo().delete(group_id).await?;

        info!(group_id = %group_id, "Group deleted");

        Ok(())
    }
}
