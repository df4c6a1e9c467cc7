//! Poll models -> entities

use community_core::entities::{Choice, Poll, Vote};
use community_core::value_objects::Snowflake;

use crate::models::{ChoiceModel, PollModel, VoteModel};

impl From<PollModel> for Poll {
    fn from(model: PollModel) -> Self {
        Poll {
            id: Snowflake::new(model.id),
            group_id: Snowflake::new(model.group_id),
            author_id: Snowflake::new(model.author_id),
            question: model.question,
            start_date: model.start_date,
            end_date: model.end_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ChoiceModel> for Choice {
    fn from(model: ChoiceModel) -> Self {
        Choice {
            id: Snowflake::new(model.id),
            poll_id: Snowflake::new(model.poll_id),
            text: model.text,
            position: model.position,
            votes: model.votes,
        }
    }
}

impl From<VoteModel> for Vote {
    fn from(model: VoteModel) -> Self {
        Vote {
            poll_id: Snowflake::new(model.poll_id),
            voter_id: Snowflake::new(model.voter_id),
            choice_id: Snowflake::new(model.choice_id),
            created_at: model.created_at,
        }
    }
}
