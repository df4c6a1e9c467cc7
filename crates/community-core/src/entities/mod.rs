//! Domain entities - core business objects

mod account;
mod content;
mod event;
mod group;
mod membership;
mod poll;

pub use account::Account;
pub use content::{excerpt, Comment, ContentRef, LikeState, Post, Reply};
pub use event::{slugify, Event, EventSchedule, Rsvp, RsvpResponse, RsvpSummary};
pub use group::{Group, GroupAdmins, Privacy, MAX_GROUP_ADMINS};
pub use membership::{MemberFilter, Membership, MembershipState};
pub use poll::{Choice, Poll, PollStatus, Vote};
