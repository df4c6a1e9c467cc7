//! # community-service
//!
//! Application layer: use cases over the `community-core` ports, request
//! and response DTOs, and the service error type.
//!
//! Services borrow a [`ServiceContext`] and are cheap to construct per
//! request:
//!
//! ```rust,ignore
//! let result = PollService::new(&ctx).cast_vote(poll_id, actor_id, request).await?;
//! ```

pub mod dto;
pub mod services;

pub use services::{
    AccountService, AuthService, ContentService, EventService, GroupService, MembershipService,
    PollService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
