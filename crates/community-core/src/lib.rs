//! # community-core
//!
//! Domain layer for the community platform: accounts, groups and their
//! membership state machine, posts with comments and replies, polls with a
//! vote ledger, and group events.
//!
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).
//! Storage, notification delivery and the wall clock are reached through the
//! ports in [`traits`].

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    excerpt, slugify, Account, Choice, Comment, ContentRef, Event, EventSchedule, Group,
    GroupAdmins, LikeState, MemberFilter, Membership, MembershipState, Poll, PollStatus, Post,
    Privacy, Reply, Rsvp, RsvpResponse, RsvpSummary, Vote, MAX_GROUP_ADMINS,
};
pub use error::DomainError;
pub use events::{Notification, NotificationTarget};
pub use traits::{
    AccountRepository, ActivationTokens, Clock, ContentRepository, EventRepository,
    GroupRepository, MembershipRepository, NotificationSink, Page, PollRepository,
    RefreshSessions, RepoResult, SystemClock,
};
pub use value_objects::{
    ContentKind, Snowflake, SnowflakeGenerator, SnowflakeParseError, Visibility,
};
