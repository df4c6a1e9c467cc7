//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Cross-field rules (date windows, unique choices) are checked by the services.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use community_core::entities::{Privacy, RsvpResponse};
use community_core::Snowflake;

/// Letters, digits and `@ . + - _`
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars")
            .with_message("Username may only contain letters, digits and @/./+/-/_".into()))
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("Must not be blank".into()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Auth Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 50, message = "Username must be 3-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8-72 characters"))]
    pub password: String,

    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivateRequest {
    #[validate(length(min = 1, max = 64, message = "Token is required"))]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Logout request; `everywhere` revokes every session of the account
#[derive(Debug, Clone, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
    #[serde(default)]
    pub everywhere: bool,
}

// ============================================================================
// Account Requests
// ============================================================================

/// Profile update; absent fields are left unchanged, empty strings clear them
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50, message = "First name must be at most 50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(max = 50, message = "Last name must be at most 50 characters"))]
    pub last_name: Option<String>,

    #[validate(length(max = 50, message = "Phone number must be at most 50 characters"))]
    pub phone_number: Option<String>,

    #[validate(length(max = 200, message = "Bio must be at most 200 characters"))]
    pub bio: Option<String>,

    #[validate(length(max = 50, message = "City must be at most 50 characters"))]
    pub current_city: Option<String>,
}

// ============================================================================
// Group Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroupRequest {
    #[validate(
        length(min = 1, max = 100, message = "Group name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub privacy: Privacy,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateGroupRequest {
    #[validate(
        length(min = 1, max = 100, message = "Group name must be 1-100 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    pub privacy: Option<Privacy>,
}

// ============================================================================
// Content Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: String,

    #[validate(
        length(min = 1, max = 10000, message = "Content must be 1-10000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(
        length(min = 1, max = 255, message = "Title must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub title: Option<String>,

    #[validate(
        length(min = 1, max = 10000, message = "Content must be 1-10000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub content: Option<String>,
}

/// Body of a comment or a reply
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        length(min = 1, max = 2000, message = "Content must be 1-2000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub content: String,
}

// ============================================================================
// Poll Requests
// ============================================================================

/// Create a poll, or replace one wholesale
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PollRequest {
    #[validate(
        length(min = 1, max = 255, message = "Question must be 1-255 characters"),
        custom(function = "validate_not_blank")
    )]
    pub question: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(length(min = 2, max = 10, message = "A poll needs 2-10 choices"))]
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastVoteRequest {
    pub choice_id: Snowflake,
}

// ============================================================================
// Event Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    #[serde(default)]
    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: String,

    pub start_at: DateTime<Utc>,

    pub end_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(
        length(min = 1, max = 200, message = "Name must be 1-200 characters"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 300, message = "Location must be at most 300 characters"))]
    pub location: Option<String>,

    pub start_at: Option<DateTime<Utc>>,

    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RsvpRequest {
    pub response: RsvpResponse,
}
