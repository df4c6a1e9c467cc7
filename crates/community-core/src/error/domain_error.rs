//! Domain errors - error types for the domain layer

use chrono::NaiveDate;
use thiserror::Error;

use crate::entities::MAX_GROUP_ADMINS;
use crate::value_objects::{ContentKind, Snowflake};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Account not found: {0}")]
    AccountNotFound(Snowflake),

    #[error("Group not found: {0}")]
    GroupNotFound(Snowflake),

    #[error("Membership not found")]
    MembershipNotFound,

    #[error("{kind} not found: {id}")]
    ContentNotFound { kind: ContentKind, id: Snowflake },

    #[error("Poll not found: {0}")]
    PollNotFound(Snowflake),

    #[error("You didn't select a valid option")]
    ChoiceNotFound,

    #[error("Event not found: {0}")]
    EventNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid or expired activation token")]
    InvalidActivationToken,

    // =========================================================================
    // Authentication Errors
    // =========================================================================
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account has not been activated")]
    AccountInactive,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a member of this group")]
    NotGroupMember,

    #[error("Only group admins can do this")]
    NotGroupAdmin,

    #[error("Only the author can do this")]
    NotAuthor,

    #[error("Only the group owner can do this")]
    NotGroupOwner,

    #[error("You are not eligible to vote in this poll")]
    NotEligible,

    #[error("Can't {action} the owner because they created this group")]
    OwnerProtected { action: &'static str },

    #[error("You cannot leave the group because you're the only admin")]
    LastAdmin,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Already a member of this group")]
    AlreadyMember,

    #[error("Already an admin of this group")]
    AlreadyAdmin,

    #[error("Group has reached the maximum of {} admins", MAX_GROUP_ADMINS)]
    AdminCapacityExceeded,

    #[error("You have already voted in this poll")]
    AlreadyVoted,

    #[error("Poll already has votes and can no longer be changed")]
    PollLocked,

    #[error("Event is in progress and can no longer be changed")]
    EventLocked,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Voting is not open yet (opens {opens})")]
    VotingNotOpen { opens: NaiveDate },

    #[error("Voting closed on {closed}")]
    VotingClosed { closed: NaiveDate },

    #[error("Suspended members cannot do this")]
    MemberSuspended,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn content_not_found(kind: ContentKind, id: Snowflake) -> Self {
        Self::ContentNotFound { kind, id }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::AccountNotFound(_) => "UNKNOWN_ACCOUNT",
            Self::GroupNotFound(_) => "UNKNOWN_GROUP",
            Self::MembershipNotFound => "UNKNOWN_MEMBERSHIP",
            Self::ContentNotFound { kind, .. } => match kind {
                ContentKind::Post => "UNKNOWN_POST",
                ContentKind::Comment => "UNKNOWN_COMMENT",
                ContentKind::Reply => "UNKNOWN_REPLY",
            },
            Self::PollNotFound(_) => "UNKNOWN_POLL",
            Self::ChoiceNotFound => "UNKNOWN_CHOICE",
            Self::EventNotFound(_) => "UNKNOWN_EVENT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidActivationToken => "INVALID_ACTIVATION_TOKEN",

            // Authentication
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",

            // Authorization
            Self::NotGroupMember => "NOT_GROUP_MEMBER",
            Self::NotGroupAdmin => "NOT_GROUP_ADMIN",
            Self::NotAuthor => "NOT_AUTHOR",
            Self::NotGroupOwner => "NOT_GROUP_OWNER",
            Self::NotEligible => "NOT_ELIGIBLE",
            Self::OwnerProtected { .. } => "OWNER_PROTECTED",
            Self::LastAdmin => "LAST_ADMIN",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyAdmin => "ALREADY_ADMIN",
            Self::AdminCapacityExceeded => "ADMIN_CAPACITY_EXCEEDED",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::PollLocked => "POLL_LOCKED",
            Self::EventLocked => "EVENT_LOCKED",

            // Business Rules
            Self::VotingNotOpen { .. } => "VOTING_NOT_OPEN",
            Self::VotingClosed { .. } => "VOTING_CLOSED",
            Self::MemberSuspended => "MEMBER_SUSPENDED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_)
                | Self::GroupNotFound(_)
                | Self::MembershipNotFound
                | Self::ContentNotFound { .. }
                | Self::PollNotFound(_)
                | Self::ChoiceNotFound
                | Self::EventNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidActivationToken
        )
    }

    /// Check if this is an authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::AccountInactive)
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotGroupMember
                | Self::NotGroupAdmin
                | Self::NotAuthor
                | Self::NotGroupOwner
                | Self::NotEligible
                | Self::OwnerProtected { .. }
                | Self::LastAdmin
                | Self::MemberSuspended
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::UsernameTaken
                | Self::EmailTaken
                | Self::AlreadyMember
                | Self::AlreadyAdmin
                | Self::AdminCapacityExceeded
                | Self::AlreadyVoted
                | Self::PollLocked
                | Self::EventLocked
        )
    }

    /// Check if this is a rejected business rule (e.g. voting window)
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::VotingNotOpen { .. } | Self::VotingClosed { .. }
        )
    }
}
