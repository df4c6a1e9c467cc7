//! Token storage module.
//!
//! Provides Redis-backed storage for:
//! - Activation tokens (single use, emailed on registration)
//! - Refresh tokens (authentication sessions)

mod activation_token;
mod refresh_token;

pub use activation_token::ActivationTokenStore;
pub use refresh_token::{RefreshTokenData, RefreshTokenStore};
