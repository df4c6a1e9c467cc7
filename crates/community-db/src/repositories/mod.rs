//! Repository implementations
//!
//! PostgreSQL implementations of the repository ports defined in community-core.

mod account;
mod content;
mod error;
mod event;
mod group;
mod membership;
mod poll;

pub use account::PgAccountRepository;
pub use content::PgContentRepository;
pub use event::PgEventRepository;
pub use group::PgGroupRepository;
pub use membership::PgMembershipRepository;
pub use poll::PgPollRepository;
