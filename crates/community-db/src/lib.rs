//! # community-db
//!
//! Database layer implementing the `community-core` repository ports with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and start-up migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! Multi-row invariants live in this crate: group creation, the admin-set
//! cap and vote casting each run inside a single transaction, and the
//! `(poll_id, voter_id)` primary key on `votes` is what ultimately rejects a
//! second vote.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use community_db::{create_pool, run_migrations, DatabaseConfig, PgPollRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool, "./migrations").await?;
//!     let polls = PgPollRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAccountRepository, PgContentRepository, PgEventRepository, PgGroupRepository,
    PgMembershipRepository, PgPollRepository,
};
