//! Route definitions
//!
//! All API routes organized by area and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{accounts, auth, content, events, groups, health, memberships, polls};
use crate::state::AppState;

/// API routes (health checks are mounted separately, outside rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Liveness and readiness checks
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(account_routes())
        .merge(group_routes())
        .merge(membership_routes())
        .merge(content_routes())
        .merge(poll_routes())
        .merge(event_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/activate", post(auth::activate))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounts/@me",
            get(accounts::get_current_account).patch(accounts::update_current_account),
        )
        .route("/accounts/@me/groups", get(accounts::get_current_account_groups))
        .route("/accounts/:account_id", get(accounts::get_account))
}

fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(groups::search_groups).post(groups::create_group))
        .route(
            "/groups/:group_id",
            get(groups::get_group)
                .patch(groups::update_group)
                .delete(groups::delete_group),
        )
}

fn membership_routes() -> Router<AppState> {
    Router::new()
        .route("/groups/:group_id/join", post(memberships::join_group))
        .route("/groups/:group_id/leave", post(memberships::leave_group))
        .route("/groups/:group_id/members", get(memberships::list_members))
        .route(
            "/groups/:group_id/members/:account_id",
            delete(memberships::remove_member),
        )
        .route(
            "/groups/:group_id/members/:account_id/approve",
            post(memberships::approve_member),
        )
        .route(
            "/groups/:group_id/members/:account_id/reject",
            post(memberships::reject_member),
        )
        .route(
            "/groups/:group_id/members/:account_id/suspension",
            post(memberships::toggle_suspension),
        )
        .route(
            "/groups/:group_id/admins/:account_id",
            put(memberships::add_admin).delete(memberships::remove_admin),
        )
}

/// Posts, comments and replies. Likes and visibility are toggled on each
/// of the three collections.
fn content_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/:group_id/posts",
            get(content::list_posts).post(content::create_post),
        )
        .route(
            "/posts/:post_id",
            get(content::get_post)
                .patch(content::update_post)
                .delete(content::delete_post),
        )
        .route("/posts/:post_id/comments", post(content::create_comment))
        .route("/comments/:comment_id/replies", post(content::create_reply))
        .route("/posts/:post_id/like", post(content::like_post))
        .route("/comments/:comment_id/like", post(content::like_comment))
        .route("/replies/:reply_id/like", post(content::like_reply))
        .route("/posts/:post_id/visibility", post(content::post_visibility))
        .route(
            "/comments/:comment_id/visibility",
            post(content::comment_visibility),
        )
        .route("/replies/:reply_id/visibility", post(content::reply_visibility))
}

fn poll_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/:group_id/polls",
            get(polls::list_polls).post(polls::create_poll),
        )
        .route(
            "/polls/:poll_id",
            patch(polls::update_poll).delete(polls::delete_poll),
        )
        .route("/polls/:poll_id/results", get(polls::get_results))
        .route("/polls/:poll_id/votes", post(polls::cast_vote))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/groups/:group_id/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/events/:event_id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .route("/events/:event_id/rsvp", put(events::respond))
}
