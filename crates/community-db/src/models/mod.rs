//! Database models - SQLx-compatible structs for PostgreSQL tables

mod account;
mod content;
mod event;
mod group;
mod membership;
mod poll;

pub use account::AccountModel;
pub use content::{CommentModel, ContentRefModel, LikeStateModel, PostModel, ReplyModel};
pub use event::{EventModel, RsvpModel};
pub use group::GroupModel;
pub use membership::MembershipModel;
pub use poll::{ChoiceModel, PollModel, VoteModel};
