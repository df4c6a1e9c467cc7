//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions for rows read back from PostgreSQL.
//! Enum columns are stored as lowercase text.

mod account;
mod content;
mod event;
mod group;
mod membership;
mod poll;

pub use content::content_ref;
pub use event::parse_rsvp_response;
pub use group::parse_privacy;
