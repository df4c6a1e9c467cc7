//! Business logic services
//!
//! Each service handles one area of the platform, validates input, checks
//! the actor's standing in the group, and orchestrates the repository ports.

pub mod access;
pub mod account;
pub mod auth;
pub mod content;
pub mod context;
pub mod error;
pub mod event;
pub mod group;
pub mod membership;
pub mod poll;

#[cfg(test)]
pub(crate) mod testing;

pub use access::AccessService;
pub use account::AccountService;
pub use auth::AuthService;
pub use content::ContentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use event::EventService;
pub use group::GroupService;
pub use membership::MembershipService;
pub use poll::PollService;
