//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.
//! Values that need extra context (like counts, the viewer's state, the
//! current time) go through small helper structs.

use chrono::{DateTime, NaiveDate, Utc};

use community_core::entities::{
    Account, Choice, Comment, Event, Group, Membership, Poll, Post, Reply, Rsvp,
};
use community_core::LikeState;

use super::responses::{
    AccountResponse, ChoiceResponse, CommentResponse, CurrentAccountResponse, EventResponse,
    GroupResponse, MembershipResponse, PollResponse, PostResponse, ReplyResponse,
    RsvpAnswerResponse,
};

// ============================================================================
// Account Mappers
// ============================================================================

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.clone(),
            full_name: account.full_name(),
            bio: account.bio.clone(),
            current_city: account.current_city.clone(),
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

impl From<&Account> for CurrentAccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            username: account.username.clone(),
            email: account.email.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            phone_number: account.phone_number.clone(),
            bio: account.bio.clone(),
            current_city: account.current_city.clone(),
            is_active: account.is_active,
            created_at: account.created_at,
        }
    }
}

impl From<Account> for CurrentAccountResponse {
    fn from(account: Account) -> Self {
        Self::from(&account)
    }
}

// ============================================================================
// Group Mappers
// ============================================================================

impl From<&Group> for GroupResponse {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.to_string(),
            name: group.name.clone(),
            description: group.description.clone(),
            privacy: group.privacy,
            owner_id: group.owner_id.to_string(),
            created_at: group.created_at,
        }
    }
}

impl From<Group> for GroupResponse {
    fn from(group: Group) -> Self {
        Self::from(&group)
    }
}

impl From<&Membership> for MembershipResponse {
    fn from(membership: &Membership) -> Self {
        Self {
            group_id: membership.group_id.to_string(),
            account_id: membership.account_id.to_string(),
            state: membership.state(),
            is_approved: membership.is_approved,
            is_suspended: membership.is_suspended,
            joined_at: membership.joined_at,
        }
    }
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self::from(&membership)
    }
}

// ============================================================================
// Content Mappers
// ============================================================================

/// Content node together with the viewer's like state
pub struct WithLikes<T> {
    pub item: T,
    pub likes: LikeState,
}

impl<T> WithLikes<T> {
    pub fn new(item: T, likes: Option<LikeState>) -> Self {
        Self {
            item,
            likes: likes.unwrap_or(LikeState {
                liked: false,
                like_count: 0,
            }),
        }
    }
}

impl From<WithLikes<Post>> for PostResponse {
    fn from(value: WithLikes<Post>) -> Self {
        let post = value.item;
        Self {
            id: post.id.to_string(),
            group_id: post.group_id.to_string(),
            author_id: post.author_id.to_string(),
            title: post.title,
            content: post.content,
            is_hidden: post.is_hidden,
            like_count: value.likes.like_count,
            liked: value.likes.liked,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self::from(WithLikes::new(post, None))
    }
}

impl From<WithLikes<Comment>> for CommentResponse {
    fn from(value: WithLikes<Comment>) -> Self {
        let comment = value.item;
        Self {
            id: comment.id.to_string(),
            post_id: comment.post_id.to_string(),
            author_id: comment.author_id.to_string(),
            content: comment.content,
            is_hidden: comment.is_hidden,
            like_count: value.likes.like_count,
            liked: value.likes.liked,
            created_at: comment.created_at,
            replies: Vec::new(),
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::from(WithLikes::new(comment, None))
    }
}

impl From<WithLikes<Reply>> for ReplyResponse {
    fn from(value: WithLikes<Reply>) -> Self {
        let reply = value.item;
        Self {
            id: reply.id.to_string(),
            comment_id: reply.comment_id.to_string(),
            author_id: reply.author_id.to_string(),
            content: reply.content,
            is_hidden: reply.is_hidden,
            like_count: value.likes.like_count,
            liked: value.likes.liked,
            created_at: reply.created_at,
        }
    }
}

impl From<Reply> for ReplyResponse {
    fn from(reply: Reply) -> Self {
        Self::from(WithLikes::new(reply, None))
    }
}

// ============================================================================
// Poll Mappers
// ============================================================================

impl From<&Choice> for ChoiceResponse {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id.to_string(),
            text: choice.text.clone(),
            position: choice.position,
            votes: choice.votes,
        }
    }
}

/// Poll with its choices, evaluated on a given day for a given viewer
pub struct PollView<'a> {
    pub poll: &'a Poll,
    pub choices: &'a [Choice],
    pub today: NaiveDate,
    pub has_voted: bool,
}

impl From<PollView<'_>> for PollResponse {
    fn from(view: PollView<'_>) -> Self {
        Self {
            id: view.poll.id.to_string(),
            group_id: view.poll.group_id.to_string(),
            author_id: view.poll.author_id.to_string(),
            question: view.poll.question.clone(),
            start_date: view.poll.start_date,
            end_date: view.poll.end_date,
            status: view.poll.status(view.today),
            has_voted: view.has_voted,
            choices: view.choices.iter().map(ChoiceResponse::from).collect(),
            created_at: view.poll.created_at,
        }
    }
}

// ============================================================================
// Event Mappers
// ============================================================================

/// Event evaluated at a given instant
pub struct EventAt<'a> {
    pub event: &'a Event,
    pub now: DateTime<Utc>,
}

impl From<EventAt<'_>> for EventResponse {
    fn from(value: EventAt<'_>) -> Self {
        let event = value.event;
        Self {
            id: event.id.to_string(),
            group_id: event.group_id.to_string(),
            host_id: event.host_id.to_string(),
            name: event.name.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            start_at: event.start_at,
            end_at: event.end_at,
            schedule: event.schedule(value.now),
            created_at: event.created_at,
        }
    }
}

impl From<&Rsvp> for RsvpAnswerResponse {
    fn from(rsvp: &Rsvp) -> Self {
        Self {
            event_id: rsvp.event_id.to_string(),
            account_id: rsvp.account_id.to_string(),
            response: rsvp.response,
            responded_at: rsvp.responded_at,
        }
    }
}
