//! Route handlers
//!
//! All HTTP request handlers organized by area.

pub mod accounts;
pub mod auth;
pub mod content;
pub mod events;
pub mod groups;
pub mod health;
pub mod memberships;
pub mod polls;
