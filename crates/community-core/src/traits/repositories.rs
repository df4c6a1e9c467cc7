//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every listing takes its filter explicitly
//! ([`Visibility`], [`MemberFilter`]); nothing is scoped by default.

use async_trait::async_trait;

use crate::entities::{
    Account, Choice, Comment, ContentRef, Event, Group, GroupAdmins, LikeState, MemberFilter,
    Membership, Poll, Post, Reply, Rsvp, Vote,
};
use crate::error::DomainError;
use crate::value_objects::{ContentKind, Snowflake, Visibility};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub const DEFAULT_SIZE: i64 = 10;
    pub const MAX_SIZE: i64 = 100;

    /// Window for a 1-based page number; out-of-range values are clamped
    pub fn new(page: i64, per_page: i64) -> Self {
        let limit = per_page.clamp(1, Self::MAX_SIZE);
        let page = page.max(1);
        Self {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }

    /// Everything, for small bounded collections
    pub fn all() -> Self {
        Self {
            limit: i64::MAX,
            offset: 0,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>>;

    /// Case-insensitive lookup
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Account>>;

    /// Create a new account; duplicate username/email map to
    /// `UsernameTaken`/`EmailTaken`
    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()>;

    async fn update(&self, account: &Account) -> RepoResult<()>;

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;
}

// ============================================================================
// Group Repository
// ============================================================================

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>>;

    /// Case-insensitive substring match on name or description, newest first
    async fn search(&self, query: Option<&str>, page: Page) -> RepoResult<Vec<Group>>;

    async fn count_search(&self, query: Option<&str>) -> RepoResult<i64>;

    /// Groups where the account holds an approved membership
    async fn find_by_member(&self, account_id: Snowflake) -> RepoResult<Vec<Group>>;

    /// Create the group, make the owner its first admin and give them an
    /// approved membership, atomically
    async fn create(&self, group: &Group) -> RepoResult<()>;

    async fn update(&self, group: &Group) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    async fn admins(&self, group_id: Snowflake) -> RepoResult<GroupAdmins>;

    /// Add an admin. The capacity check and the insert run as one unit;
    /// a full admin set yields `AdminCapacityExceeded`
    async fn add_admin(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<()>;

    /// Returns whether the account was an admin
    async fn remove_admin(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<bool>;

    /// Approved, non-suspended members
    async fn member_count(&self, group_id: Snowflake) -> RepoResult<i64>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn find(&self, group_id: Snowflake, account_id: Snowflake)
        -> RepoResult<Option<Membership>>;

    /// Insert a membership; an existing (group, account) pair yields `AlreadyMember`
    async fn create(&self, membership: &Membership) -> RepoResult<()>;

    /// Persist approval and suspension flags
    async fn update(&self, membership: &Membership) -> RepoResult<()>;

    /// Persist the suspension flag; suspending also drops any admin entry for
    /// the pair in the same transaction. Returns whether an admin entry was removed.
    async fn set_suspension(&self, membership: &Membership) -> RepoResult<bool>;

    /// Delete the membership together with any admin entry for the pair
    async fn delete(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<()>;

    async fn list(
        &self,
        group_id: Snowflake,
        filter: MemberFilter,
        page: Page,
    ) -> RepoResult<Vec<Membership>>;
}

// ============================================================================
// Content Repository
// ============================================================================

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create_post(&self, post: &Post) -> RepoResult<()>;

    async fn find_post(&self, id: Snowflake) -> RepoResult<Option<Post>>;

    async fn update_post(&self, post: &Post) -> RepoResult<()>;

    async fn delete_post(&self, id: Snowflake) -> RepoResult<()>;

    /// Posts of a group, newest first
    async fn list_posts(
        &self,
        group_id: Snowflake,
        visibility: Visibility,
        page: Page,
    ) -> RepoResult<Vec<Post>>;

    async fn create_comment(&self, comment: &Comment) -> RepoResult<()>;

    async fn find_comment(&self, id: Snowflake) -> RepoResult<Option<Comment>>;

    /// Comments of a post, oldest first
    async fn list_comments(
        &self,
        post_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Comment>>;

    async fn create_reply(&self, reply: &Reply) -> RepoResult<()>;

    async fn find_reply(&self, id: Snowflake) -> RepoResult<Option<Reply>>;

    /// Replies to any of the given comments, oldest first
    async fn list_replies(
        &self,
        comment_ids: &[Snowflake],
        visibility: Visibility,
    ) -> RepoResult<Vec<Reply>>;

    /// Resolve any content node to its author and owning group
    async fn find_ref(&self, kind: ContentKind, id: Snowflake) -> RepoResult<Option<ContentRef>>;

    /// Add the account to the like-set if absent, remove it otherwise
    async fn toggle_like(
        &self,
        kind: ContentKind,
        id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<LikeState>;

    /// Like count and the viewer's own like for each id
    async fn like_states(
        &self,
        kind: ContentKind,
        ids: &[Snowflake],
        viewer: Snowflake,
    ) -> RepoResult<Vec<(Snowflake, LikeState)>>;

    /// Flip `is_hidden` and return the new value
    async fn toggle_hidden(&self, kind: ContentKind, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Poll Repository
// ============================================================================

#[async_trait]
pub trait PollRepository: Send + Sync {
    /// Insert the poll with its choices atomically
    async fn create(&self, poll: &Poll, choices: &[Choice]) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Poll>>;

    /// Polls of a group, newest first
    async fn find_by_group(&self, group_id: Snowflake) -> RepoResult<Vec<Poll>>;

    /// Choices ordered by position
    async fn choices(&self, poll_id: Snowflake) -> RepoResult<Vec<Choice>>;

    /// Replace question, window and choices; fails with `PollLocked` if any
    /// vote exists when the replacement runs
    async fn replace(&self, poll: &Poll, choices: &[Choice]) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    async fn find_vote(&self, poll_id: Snowflake, voter_id: Snowflake)
        -> RepoResult<Option<Vote>>;

    /// Subset of `poll_ids` the voter has voted in
    async fn voted_in(&self, voter_id: Snowflake, poll_ids: &[Snowflake])
        -> RepoResult<Vec<Snowflake>>;

    /// Record the vote and bump the choice counter as one unit.
    ///
    /// An existing (poll, voter) row yields `AlreadyVoted`; a choice that
    /// does not belong to the poll yields `ChoiceNotFound`. Either way
    /// nothing is written.
    async fn cast_vote(&self, vote: &Vote) -> RepoResult<()>;
}

// ============================================================================
// Event Repository
// ============================================================================

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> RepoResult<()>;

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>>;

    /// Events of a group, latest start first
    async fn find_by_group(&self, group_id: Snowflake) -> RepoResult<Vec<Event>>;

    async fn update(&self, event: &Event) -> RepoResult<()>;

    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Insert or overwrite the account's response
    async fn upsert_rsvp(&self, rsvp: &Rsvp) -> RepoResult<()>;

    async fn rsvps(&self, event_id: Snowflake) -> RepoResult<Vec<Rsvp>>;
}
