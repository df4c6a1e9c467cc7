//! Event models -> entities

use community_core::entities::{Event, Rsvp, RsvpResponse};
use community_core::value_objects::Snowflake;

use crate::models::{EventModel, RsvpModel};

/// The column is CHECK-constrained; anything else reads as "maybe"
pub fn parse_rsvp_response(value: &str) -> RsvpResponse {
    RsvpResponse::parse(value).unwrap_or(RsvpResponse::Maybe)
}

impl From<EventModel> for Event {
    fn from(model: EventModel) -> Self {
        Event {
            id: Snowflake::new(model.id),
            group_id: Snowflake::new(model.group_id),
            host_id: Snowflake::new(model.host_id),
            name: model.name,
            slug: model.slug,
            description: model.description,
            location: model.location,
            start_at: model.start_at,
            end_at: model.end_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RsvpModel> for Rsvp {
    fn from(model: RsvpModel) -> Self {
        Rsvp {
            event_id: Snowflake::new(model.event_id),
            account_id: Snowflake::new(model.account_id),
            response: parse_rsvp_response(&model.response),
            responded_at: model.responded_at,
        }
    }
}
