//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    ActivateRequest, CastVoteRequest, CreateCommentRequest, CreateEventRequest,
    CreateGroupRequest, CreatePostRequest, LoginRequest, LogoutRequest, PollRequest,
    RefreshTokenRequest, RegisterRequest, RsvpRequest, UpdateEventRequest, UpdateGroupRequest,
    UpdatePostRequest, UpdateProfileRequest,
};

// Re-export commonly used response types
pub use responses::{
    AccountResponse, AdminsResponse, AuthResponse, ChoiceResponse, CommentResponse,
    CurrentAccountResponse, EventDetailResponse, EventListResponse, EventResponse,
    GroupDetailResponse, GroupResponse, HealthChecks, HealthResponse, LikeResponse,
    MemberResponse, MembershipResponse, PaginatedResponse, PaginationMeta, PollResponse,
    PollResultsResponse, PostDetailResponse, PostResponse, ReadinessResponse, RegisterResponse,
    ReplyResponse, RsvpAnswerResponse, VisibilityResponse, VoteResponse,
};

// Re-export mappers and helper structs
pub use mappers::{EventAt, PollView, WithLikes};
