//! Group model -> entity

use community_core::entities::{Group, Privacy};
use community_core::value_objects::Snowflake;

use crate::models::GroupModel;

/// Unknown values are treated as private so they never open a group up
pub fn parse_privacy(value: &str) -> Privacy {
    Privacy::parse(value).unwrap_or(Privacy::Private)
}

impl From<GroupModel> for Group {
    fn from(model: GroupModel) -> Self {
        Group {
            id: Snowflake::new(model.id),
            name: model.name,
            description: model.description,
            privacy: parse_privacy(&model.privacy),
            owner_id: Snowflake::new(model.owner_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
