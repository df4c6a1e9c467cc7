//! Test fixtures and data generators
//!
//! Client-side shapes of the API's requests and responses. Ids travel as
//! strings.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data. Mixed with the process id so reruns
/// against the same database do not collide.
pub fn unique_suffix() -> String {
    format!("{}x{}", std::process::id(), COUNTER.fetch_add(1, Ordering::SeqCst))
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            username: format!("member{suffix}"),
            email: format!("member{suffix}@example.com"),
            password: "TestPass123!".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
    pub everywhere: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    pub account: AccountResponse,
    pub activation_required: bool,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub account: AccountResponse,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_active: Option<bool>,
}

// ============================================================================
// Groups and membership
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub privacy: String,
}

impl CreateGroupRequest {
    pub fn public() -> Self {
        Self::with_privacy("public")
    }

    pub fn private() -> Self {
        Self::with_privacy("private")
    }

    fn with_privacy(privacy: &str) -> Self {
        Self {
            name: format!("Group {}", unique_suffix()),
            description: Some("Integration test group".to_string()),
            privacy: privacy.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GroupResponse {
    pub id: String,
    pub name: String,
    pub privacy: String,
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MembershipResponse {
    pub group_id: String,
    pub account_id: String,
    pub state: String,
    pub is_approved: bool,
    pub is_suspended: bool,
}

// ============================================================================
// Content
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    pub fn unique() -> Self {
        Self {
            title: format!("Post {}", unique_suffix()),
            content: "Hello from the integration tests".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub group_id: String,
    pub author_id: String,
    pub is_hidden: bool,
    pub like_count: i64,
    pub liked: bool,
}

#[derive(Debug, Deserialize)]
pub struct LikeResponse {
    pub kind: String,
    pub id: String,
    pub liked: bool,
    pub like_count: i64,
}

// ============================================================================
// Polls
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PollRequest {
    pub question: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub choices: Vec<String>,
}

impl PollRequest {
    /// A poll open for a week around today
    pub fn open_now() -> Self {
        let today = Utc::now().date_naive();
        Self {
            question: "Where should we meet?".to_string(),
            start_date: today - Duration::days(1),
            end_date: today + Duration::days(7),
            choices: vec!["Library".to_string(), "Park".to_string()],
        }
    }

    /// A poll whose voting starts next month
    pub fn upcoming() -> Self {
        let today = Utc::now().date_naive();
        Self {
            start_date: today + Duration::days(30),
            end_date: today + Duration::days(37),
            ..Self::open_now()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CastVoteRequest {
    pub choice_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceResponse {
    pub id: String,
    pub text: String,
    pub position: i32,
    pub votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct PollResponse {
    pub id: String,
    pub status: String,
    pub has_voted: bool,
    pub choices: Vec<ChoiceResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PollResultsResponse {
    pub poll_id: String,
    pub choices: Vec<ChoiceResponse>,
    pub total_votes: i64,
}

#[derive(Debug, Deserialize)]
pub struct VoteResponse {
    pub poll_id: String,
    pub choice_id: String,
}

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl CreateEventRequest {
    pub fn tomorrow() -> Self {
        let start_at = Utc::now() + Duration::days(1);
        Self {
            name: format!("Meetup {}", unique_suffix()),
            description: "Monthly meetup".to_string(),
            location: "Community hall".to_string(),
            start_at,
            end_at: start_at + Duration::hours(2),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RsvpRequest {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct EventResponse {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub schedule: String,
}

#[derive(Debug, Deserialize)]
pub struct RsvpSummary {
    pub yes: i64,
    pub no: i64,
    pub maybe: i64,
    pub pending: i64,
}

#[derive(Debug, Deserialize)]
pub struct EventDetailResponse {
    pub id: String,
    pub rsvp: RsvpSummary,
    pub my_response: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityResponse {
    pub kind: String,
    pub id: String,
    pub is_hidden: bool,
}
