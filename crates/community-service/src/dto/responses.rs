//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use community_core::entities::{
    EventSchedule, MembershipState, PollStatus, Privacy, RsvpResponse, RsvpSummary,
};
use community_core::{ContentKind, LikeState};

// ============================================================================
// Common Response Types
// ============================================================================

/// Page-numbered listing
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total: i64) -> Self {
        let has_more = page.saturating_mul(per_page) < total;
        Self {
            data,
            pagination: PaginationMeta {
                page,
                per_page,
                total,
                has_more,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// 1-based page number
    pub page: i64,
    pub per_page: i64,
    /// Total matching items across all pages
    pub total: i64,
    pub has_more: bool,
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Authentication response with tokens
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: CurrentAccountResponse,
}

impl AuthResponse {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        account: CurrentAccountResponse,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            account,
        }
    }
}

/// Result of registration; tokens are only issued after activation
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub account: CurrentAccountResponse,
    pub activation_required: bool,
}

// ============================================================================
// Account Responses
// ============================================================================

/// Public profile of an account
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_city: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The authenticated account, including private fields
#[derive(Debug, Clone, Serialize)]
pub struct CurrentAccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub current_city: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Group Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub privacy: Privacy,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// Group with counts and the viewer's standing in it
#[derive(Debug, Clone, Serialize)]
pub struct GroupDetailResponse {
    #[serde(flatten)]
    pub group: GroupResponse,
    pub member_count: i64,
    pub admin_ids: Vec<String>,
    /// `None` when the viewer has no membership
    pub membership: Option<MembershipState>,
    pub is_admin: bool,
}

// ============================================================================
// Membership Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub group_id: String,
    pub account_id: String,
    pub state: MembershipState,
    pub is_approved: bool,
    pub is_suspended: bool,
    pub joined_at: DateTime<Utc>,
}

/// Membership joined with the member's public profile
#[derive(Debug, Clone, Serialize)]
pub struct MemberResponse {
    #[serde(flatten)]
    pub membership: MembershipResponse,
    pub account: Option<AccountResponse>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminsResponse {
    pub group_id: String,
    pub admin_ids: Vec<String>,
}

// ============================================================================
// Content Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: String,
    pub group_id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub is_hidden: bool,
    pub like_count: i64,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub content: String,
    pub is_hidden: bool,
    pub like_count: i64,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<ReplyResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyResponse {
    pub id: String,
    pub comment_id: String,
    pub author_id: String,
    pub content: String,
    pub is_hidden: bool,
    pub like_count: i64,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

/// A post with its comment tree
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub kind: ContentKind,
    pub id: String,
    pub liked: bool,
    pub like_count: i64,
}

impl LikeResponse {
    pub fn new(kind: ContentKind, id: impl ToString, state: LikeState) -> Self {
        Self {
            kind,
            id: id.to_string(),
            liked: state.liked,
            like_count: state.like_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResponse {
    pub kind: ContentKind,
    pub id: String,
    pub is_hidden: bool,
}

// ============================================================================
// Poll Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ChoiceResponse {
    pub id: String,
    pub text: String,
    pub position: i32,
    pub votes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResponse {
    pub id: String,
    pub group_id: String,
    pub author_id: String,
    pub question: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PollStatus,
    pub has_voted: bool,
    pub choices: Vec<ChoiceResponse>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollResultsResponse {
    pub poll_id: String,
    pub question: String,
    pub status: PollStatus,
    pub choices: Vec<ChoiceResponse>,
    pub total_votes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub poll_id: String,
    pub choice_id: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Event Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub id: String,
    pub group_id: String,
    pub host_id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub schedule: EventSchedule,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetailResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub rsvp: RsvpSummary,
    /// The viewer's own answer, if any
    pub my_response: Option<RsvpResponse>,
}

/// Events of a group split by schedule
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventListResponse {
    pub upcoming: Vec<EventResponse>,
    pub ongoing: Vec<EventResponse>,
    pub past: Vec<EventResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RsvpAnswerResponse {
    pub event_id: String,
    pub account_id: String,
    pub response: RsvpResponse,
    pub responded_at: DateTime<Utc>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: if database_healthy { "healthy" } else { "unhealthy" }.to_string(),
                redis: if redis_healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
