//! Membership model -> entity

use community_core::entities::Membership;
use community_core::value_objects::Snowflake;

use crate::models::MembershipModel;

impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            group_id: Snowflake::new(model.group_id),
            account_id: Snowflake::new(model.account_id),
            is_approved: model.is_approved,
            is_suspended: model.is_suspended,
            joined_at: model.joined_at,
            updated_at: model.updated_at,
        }
    }
}
