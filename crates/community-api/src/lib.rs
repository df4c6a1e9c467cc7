//! # community-api
//!
//! REST API server built with the Axum framework. Handlers are thin: they
//! extract the caller and the request, call one service operation and map
//! the outcome onto a JSON response.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run};
pub use state::AppState;
