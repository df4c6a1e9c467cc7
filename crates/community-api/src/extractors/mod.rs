//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and query
//! strings. Every rejection is an [`ApiError`](crate::response::ApiError)
//! so clients always receive the JSON error body.

mod auth;
mod pagination;
mod path;
mod query;
mod validated;

pub use auth::AuthUser;
pub use pagination::Pagination;
pub use path::{PathId, PathIds};
pub use query::QueryParams;
pub use validated::{Body, ValidatedJson};
