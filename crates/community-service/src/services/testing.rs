//! In-memory ports for service tests
//!
//! `MemoryStore` implements every repository and token port over one
//! mutex-guarded state, with the same error contract as the Postgres and
//! Redis adapters. Vote casting and admin promotion run entirely under the
//! lock, which gives them the same all-or-nothing behaviour as the
//! database transactions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use community_common::auth::JwtService;
use community_core::entities::{
    Account, Choice, Comment, ContentRef, Event, Group, GroupAdmins, LikeState, MemberFilter,
    Membership, Poll, Post, Privacy, Reply, Rsvp, Vote, MAX_GROUP_ADMINS,
};
use community_core::events::Notification;
use community_core::traits::{
    AccountRepository, ActivationTokens, Clock, ContentRepository, EventRepository,
    GroupRepository, MembershipRepository, NotificationSink, Page, PollRepository,
    RefreshSessions, RepoResult,
};
use community_core::{ContentKind, DomainError, Snowflake, SnowflakeGenerator, Visibility};

use super::context::ServiceContext;

pub const TEST_PASSWORD: &str = "Corr3ctHorse";

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(offset).take(limit).collect()
}

// ============================================================================
// State
// ============================================================================

#[derive(Default)]
pub struct State {
    pub accounts: HashMap<Snowflake, (Account, String)>,
    pub groups: HashMap<Snowflake, Group>,
    pub admins: HashMap<Snowflake, Vec<Snowflake>>,
    pub memberships: HashMap<(Snowflake, Snowflake), Membership>,
    pub posts: HashMap<Snowflake, Post>,
    pub comments: HashMap<Snowflake, Comment>,
    pub replies: HashMap<Snowflake, Reply>,
    pub likes: HashSet<(ContentKind, Snowflake, Snowflake)>,
    pub polls: HashMap<Snowflake, Poll>,
    pub choices: HashMap<Snowflake, Choice>,
    pub votes: HashMap<(Snowflake, Snowflake), Vote>,
    pub events: HashMap<Snowflake, Event>,
    pub rsvps: HashMap<(Snowflake, Snowflake), Rsvp>,
    pub activation_tokens: HashMap<String, Snowflake>,
    pub refresh_sessions: HashMap<String, Snowflake>,
    next_token: u64,
}

impl State {
    fn content_ref(&self, kind: ContentKind, id: Snowflake) -> Option<ContentRef> {
        let (group_id, author_id, is_hidden) = match kind {
            ContentKind::Post => {
                let post = self.posts.get(&id)?;
                (post.group_id, post.author_id, post.is_hidden)
            }
            ContentKind::Comment => {
                let comment = self.comments.get(&id)?;
                let post = self.posts.get(&comment.post_id)?;
                (post.group_id, comment.author_id, comment.is_hidden)
            }
            ContentKind::Reply => {
                let reply = self.replies.get(&id)?;
                let comment = self.comments.get(&reply.comment_id)?;
                let post = self.posts.get(&comment.post_id)?;
                (post.group_id, reply.author_id, reply.is_hidden)
            }
        };
        Some(ContentRef {
            kind,
            id,
            group_id,
            author_id,
            is_hidden,
        })
    }

    fn like_state(&self, kind: ContentKind, id: Snowflake, viewer: Snowflake) -> LikeState {
        let like_count = self
            .likes
            .iter()
            .filter(|(k, content, _)| *k == kind && *content == id)
            .count() as i64;
        LikeState {
            liked: self.likes.contains(&(kind, id, viewer)),
            like_count,
        }
    }

    fn hidden_flag(&mut self, kind: ContentKind, id: Snowflake) -> Option<&mut bool> {
        match kind {
            ContentKind::Post => self.posts.get_mut(&id).map(|p| &mut p.is_hidden),
            ContentKind::Comment => self.comments.get_mut(&id).map(|c| &mut c.is_hidden),
            ContentKind::Reply => self.replies.get_mut(&id).map(|r| &mut r.is_hidden),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

// ============================================================================
// Repositories
// ============================================================================

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        Ok(self.state().accounts.get(&id).map(|(a, _)| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        Ok(self
            .state()
            .accounts
            .values()
            .find(|(a, _)| a.email.eq_ignore_ascii_case(email))
            .map(|(a, _)| a.clone()))
    }

    async fn find_many(&self, ids: &[Snowflake]) -> RepoResult<Vec<Account>> {
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.accounts.get(id).map(|(a, _)| a.clone()))
            .collect())
    }

    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        let mut state = self.state();
        for (existing, _) in state.accounts.values() {
            if existing.username == account.username {
                return Err(DomainError::UsernameTaken);
            }
            if existing.email.eq_ignore_ascii_case(&account.email) {
                return Err(DomainError::EmailTaken);
            }
        }
        state
            .accounts
            .insert(account.id, (account.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, account: &Account) -> RepoResult<()> {
        let mut state = self.state();
        let entry = state
            .accounts
            .get_mut(&account.id)
            .ok_or(DomainError::AccountNotFound(account.id))?;
        entry.0 = account.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.state().accounts.get(&id).map(|(_, h)| h.clone()))
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Group>> {
        Ok(self.state().groups.get(&id).cloned())
    }

    async fn search(&self, query: Option<&str>, page: Page) -> RepoResult<Vec<Group>> {
        let state = self.state();
        let needle = query.map(str::to_lowercase);
        let mut groups: Vec<Group> = state
            .groups
            .values()
            .filter(|g| match &needle {
                None => true,
                Some(n) => {
                    g.name.to_lowercase().contains(n)
                        || g.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(n))
                }
            })
            .cloned()
            .collect();
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(groups, page))
    }

    async fn count_search(&self, query: Option<&str>) -> RepoResult<i64> {
        Ok(GroupRepository::search(self, query, Page::all()).await?.len() as i64)
    }

    async fn find_by_member(&self, account_id: Snowflake) -> RepoResult<Vec<Group>> {
        let state = self.state();
        Ok(state
            .memberships
            .values()
            .filter(|m| m.account_id == account_id && m.is_approved)
            .filter_map(|m| state.groups.get(&m.group_id).cloned())
            .collect())
    }

    async fn create(&self, group: &Group) -> RepoResult<()> {
        let mut state = self.state();
        state.groups.insert(group.id, group.clone());
        state.admins.insert(group.id, vec![group.owner_id]);
        state.memberships.insert(
            (group.id, group.owner_id),
            Membership::owner(group.id, group.owner_id),
        );
        Ok(())
    }

    async fn update(&self, group: &Group) -> RepoResult<()> {
        let mut state = self.state();
        let existing = state
            .groups
            .get_mut(&group.id)
            .ok_or(DomainError::GroupNotFound(group.id))?;
        *existing = group.clone();
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state();
        state.groups.remove(&id).ok_or(DomainError::GroupNotFound(id))?;
        state.admins.remove(&id);
        state.memberships.retain(|(g, _), _| *g != id);
        state.posts.retain(|_, p| p.group_id != id);
        state.polls.retain(|_, p| p.group_id != id);
        state.events.retain(|_, e| e.group_id != id);
        Ok(())
    }

    async fn admins(&self, group_id: Snowflake) -> RepoResult<GroupAdmins> {
        Ok(GroupAdmins::new(
            self.state().admins.get(&group_id).cloned().unwrap_or_default(),
        ))
    }

    async fn add_admin(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state();
        if !state.groups.contains_key(&group_id) {
            return Err(DomainError::GroupNotFound(group_id));
        }
        let admins = state.admins.entry(group_id).or_default();
        if admins.len() >= MAX_GROUP_ADMINS {
            return Err(DomainError::AdminCapacityExceeded);
        }
        if admins.contains(&account_id) {
            return Err(DomainError::AlreadyAdmin);
        }
        admins.push(account_id);
        Ok(())
    }

    async fn remove_admin(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state();
        let Some(admins) = state.admins.get_mut(&group_id) else {
            return Ok(false);
        };
        let before = admins.len();
        admins.retain(|id| *id != account_id);
        Ok(admins.len() != before)
    }

    async fn member_count(&self, group_id: Snowflake) -> RepoResult<i64> {
        Ok(self
            .state()
            .memberships
            .values()
            .filter(|m| m.group_id == group_id && m.is_active())
            .count() as i64)
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn find(
        &self,
        group_id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        Ok(self.state().memberships.get(&(group_id, account_id)).cloned())
    }

    async fn create(&self, membership: &Membership) -> RepoResult<()> {
        let mut state = self.state();
        if !state.groups.contains_key(&membership.group_id) {
            return Err(DomainError::GroupNotFound(membership.group_id));
        }
        let key = (membership.group_id, membership.account_id);
        if state.memberships.contains_key(&key) {
            return Err(DomainError::AlreadyMember);
        }
        state.memberships.insert(key, membership.clone());
        Ok(())
    }

    async fn update(&self, membership: &Membership) -> RepoResult<()> {
        let mut state = self.state();
        let existing = state
            .memberships
            .get_mut(&(membership.group_id, membership.account_id))
            .ok_or(DomainError::MembershipNotFound)?;
        *existing = membership.clone();
        Ok(())
    }

    async fn set_suspension(&self, membership: &Membership) -> RepoResult<bool> {
        let mut state = self.state();
        let (group_id, account_id) = (membership.group_id, membership.account_id);
        let existing = state
            .memberships
            .get_mut(&(group_id, account_id))
            .ok_or(DomainError::MembershipNotFound)?;
        existing.is_suspended = membership.is_suspended;
        existing.updated_at = membership.updated_at;

        if !membership.is_suspended {
            return Ok(false);
        }
        let Some(admins) = state.admins.get_mut(&group_id) else {
            return Ok(false);
        };
        let before = admins.len();
        admins.retain(|id| *id != account_id);
        Ok(admins.len() < before)
    }

    async fn delete(&self, group_id: Snowflake, account_id: Snowflake) -> RepoResult<()> {
        let mut state = self.state();
        state
            .memberships
            .remove(&(group_id, account_id))
            .ok_or(DomainError::MembershipNotFound)?;
        if let Some(admins) = state.admins.get_mut(&group_id) {
            admins.retain(|id| *id != account_id);
        }
        Ok(())
    }

    async fn list(
        &self,
        group_id: Snowflake,
        filter: MemberFilter,
        page: Page,
    ) -> RepoResult<Vec<Membership>> {
        let mut members: Vec<Membership> = self
            .state()
            .memberships
            .values()
            .filter(|m| m.group_id == group_id && filter.admits(m))
            .cloned()
            .collect();
        members.sort_by_key(|m| (m.joined_at, m.account_id));
        Ok(paginate(members, page))
    }
}

#[async_trait]
impl ContentRepository for MemoryStore {
    async fn create_post(&self, post: &Post) -> RepoResult<()> {
        let mut state = self.state();
        if !state.groups.contains_key(&post.group_id) {
            return Err(DomainError::GroupNotFound(post.group_id));
        }
        state.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_post(&self, id: Snowflake) -> RepoResult<Option<Post>> {
        Ok(self.state().posts.get(&id).cloned())
    }

    async fn update_post(&self, post: &Post) -> RepoResult<()> {
        let mut state = self.state();
        let existing = state
            .posts
            .get_mut(&post.id)
            .ok_or(DomainError::content_not_found(ContentKind::Post, post.id))?;
        *existing = post.clone();
        Ok(())
    }

    async fn delete_post(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state();
        state
            .posts
            .remove(&id)
            .ok_or(DomainError::content_not_found(ContentKind::Post, id))?;
        state.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }

    async fn list_posts(
        &self,
        group_id: Snowflake,
        visibility: Visibility,
        page: Page,
    ) -> RepoResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .state()
            .posts
            .values()
            .filter(|p| p.group_id == group_id && visibility.admits(p.is_hidden))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paginate(posts, page))
    }

    async fn create_comment(&self, comment: &Comment) -> RepoResult<()> {
        let mut state = self.state();
        if !state.posts.contains_key(&comment.post_id) {
            return Err(DomainError::content_not_found(
                ContentKind::Post,
                comment.post_id,
            ));
        }
        state.comments.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn find_comment(&self, id: Snowflake) -> RepoResult<Option<Comment>> {
        Ok(self.state().comments.get(&id).cloned())
    }

    async fn list_comments(
        &self,
        post_id: Snowflake,
        visibility: Visibility,
    ) -> RepoResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state()
            .comments
            .values()
            .filter(|c| c.post_id == post_id && visibility.admits(c.is_hidden))
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn create_reply(&self, reply: &Reply) -> RepoResult<()> {
        let mut state = self.state();
        if !state.comments.contains_key(&reply.comment_id) {
            return Err(DomainError::content_not_found(
                ContentKind::Comment,
                reply.comment_id,
            ));
        }
        state.replies.insert(reply.id, reply.clone());
        Ok(())
    }

    async fn find_reply(&self, id: Snowflake) -> RepoResult<Option<Reply>> {
        Ok(self.state().replies.get(&id).cloned())
    }

    async fn list_replies(
        &self,
        comment_ids: &[Snowflake],
        visibility: Visibility,
    ) -> RepoResult<Vec<Reply>> {
        let mut replies: Vec<Reply> = self
            .state()
            .replies
            .values()
            .filter(|r| comment_ids.contains(&r.comment_id) && visibility.admits(r.is_hidden))
            .cloned()
            .collect();
        replies.sort_by_key(|r| (r.created_at, r.id));
        Ok(replies)
    }

    async fn find_ref(&self, kind: ContentKind, id: Snowflake) -> RepoResult<Option<ContentRef>> {
        Ok(self.state().content_ref(kind, id))
    }

    async fn toggle_like(
        &self,
        kind: ContentKind,
        id: Snowflake,
        account_id: Snowflake,
    ) -> RepoResult<LikeState> {
        let mut state = self.state();
        if state.content_ref(kind, id).is_none() {
            return Err(DomainError::content_not_found(kind, id));
        }
        let key = (kind, id, account_id);
        if !state.likes.remove(&key) {
            state.likes.insert(key);
        }
        Ok(state.like_state(kind, id, account_id))
    }

    async fn like_states(
        &self,
        kind: ContentKind,
        ids: &[Snowflake],
        viewer: Snowflake,
    ) -> RepoResult<Vec<(Snowflake, LikeState)>> {
        let state = self.state();
        Ok(ids
            .iter()
            .map(|id| (*id, state.like_state(kind, *id, viewer)))
            .collect())
    }

    async fn toggle_hidden(&self, kind: ContentKind, id: Snowflake) -> RepoResult<bool> {
        let mut state = self.state();
        let flag = state
            .hidden_flag(kind, id)
            .ok_or(DomainError::content_not_found(kind, id))?;
        *flag = !*flag;
        Ok(*flag)
    }
}

#[async_trait]
impl PollRepository for MemoryStore {
    async fn create(&self, poll: &Poll, choices: &[Choice]) -> RepoResult<()> {
        let mut state = self.state();
        if !state.groups.contains_key(&poll.group_id) {
            return Err(DomainError::GroupNotFound(poll.group_id));
        }
        state.polls.insert(poll.id, poll.clone());
        for choice in choices {
            state.choices.insert(choice.id, choice.clone());
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Poll>> {
        Ok(self.state().polls.get(&id).cloned())
    }

    async fn find_by_group(&self, group_id: Snowflake) -> RepoResult<Vec<Poll>> {
        let mut polls: Vec<Poll> = self
            .state()
            .polls
            .values()
            .filter(|p| p.group_id == group_id)
            .cloned()
            .collect();
        polls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(polls)
    }

    async fn choices(&self, poll_id: Snowflake) -> RepoResult<Vec<Choice>> {
        let mut choices: Vec<Choice> = self
            .state()
            .choices
            .values()
            .filter(|c| c.poll_id == poll_id)
            .cloned()
            .collect();
        choices.sort_by_key(|c| c.position);
        Ok(choices)
    }

    async fn replace(&self, poll: &Poll, choices: &[Choice]) -> RepoResult<()> {
        let mut state = self.state();
        if !state.polls.contains_key(&poll.id) {
            return Err(DomainError::PollNotFound(poll.id));
        }
        if state.votes.keys().any(|(p, _)| *p == poll.id) {
            return Err(DomainError::PollLocked);
        }
        state.polls.insert(poll.id, poll.clone());
        state.choices.retain(|_, c| c.poll_id != poll.id);
        for choice in choices {
            state.choices.insert(choice.id, choice.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state();
        state.polls.remove(&id).ok_or(DomainError::PollNotFound(id))?;
        state.choices.retain(|_, c| c.poll_id != id);
        state.votes.retain(|(p, _), _| *p != id);
        Ok(())
    }

    async fn find_vote(&self, poll_id: Snowflake, voter_id: Snowflake) -> RepoResult<Option<Vote>> {
        Ok(self.state().votes.get(&(poll_id, voter_id)).cloned())
    }

    async fn voted_in(
        &self,
        voter_id: Snowflake,
        poll_ids: &[Snowflake],
    ) -> RepoResult<Vec<Snowflake>> {
        let state = self.state();
        Ok(poll_ids
            .iter()
            .copied()
            .filter(|p| state.votes.contains_key(&(*p, voter_id)))
            .collect())
    }

    async fn cast_vote(&self, vote: &Vote) -> RepoResult<()> {
        let mut state = self.state();
        let key = (vote.poll_id, vote.voter_id);
        if state.votes.contains_key(&key) {
            return Err(DomainError::AlreadyVoted);
        }
        let choice = state
            .choices
            .get_mut(&vote.choice_id)
            .filter(|c| c.poll_id == vote.poll_id)
            .ok_or(DomainError::ChoiceNotFound)?;
        choice.votes += 1;
        state.votes.insert(key, vote.clone());
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, event: &Event) -> RepoResult<()> {
        let mut state = self.state();
        if !state.groups.contains_key(&event.group_id) {
            return Err(DomainError::GroupNotFound(event.group_id));
        }
        state.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        Ok(self.state().events.get(&id).cloned())
    }

    async fn find_by_group(&self, group_id: Snowflake) -> RepoResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .state()
            .events
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.start_at.cmp(&a.start_at));
        Ok(events)
    }

    async fn update(&self, event: &Event) -> RepoResult<()> {
        let mut state = self.state();
        let existing = state
            .events
            .get_mut(&event.id)
            .ok_or(DomainError::EventNotFound(event.id))?;
        *existing = event.clone();
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut state = self.state();
        state.events.remove(&id).ok_or(DomainError::EventNotFound(id))?;
        state.rsvps.retain(|(e, _), _| *e != id);
        Ok(())
    }

    async fn upsert_rsvp(&self, rsvp: &Rsvp) -> RepoResult<()> {
        let mut state = self.state();
        if !state.events.contains_key(&rsvp.event_id) {
            return Err(DomainError::EventNotFound(rsvp.event_id));
        }
        state
            .rsvps
            .insert((rsvp.event_id, rsvp.account_id), rsvp.clone());
        Ok(())
    }

    async fn rsvps(&self, event_id: Snowflake) -> RepoResult<Vec<Rsvp>> {
        let mut rsvps: Vec<Rsvp> = self
            .state()
            .rsvps
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        rsvps.sort_by_key(|r| r.responded_at);
        Ok(rsvps)
    }
}

// ============================================================================
// Token stores
// ============================================================================

#[async_trait]
impl ActivationTokens for MemoryStore {
    async fn issue(&self, account_id: Snowflake) -> Result<String, DomainError> {
        let mut state = self.state();
        state.next_token += 1;
        let token = format!("token{}", state.next_token);
        state.activation_tokens.insert(token.clone(), account_id);
        Ok(token)
    }

    async fn consume(&self, token: &str) -> Result<Option<Snowflake>, DomainError> {
        Ok(self.state().activation_tokens.remove(token))
    }
}

#[async_trait]
impl RefreshSessions for MemoryStore {
    async fn store(&self, jti: &str, account_id: Snowflake) -> Result<(), DomainError> {
        self.state()
            .refresh_sessions
            .insert(jti.to_string(), account_id);
        Ok(())
    }

    async fn revoke(&self, jti: &str) -> Result<Option<Snowflake>, DomainError> {
        Ok(self.state().refresh_sessions.remove(jti))
    }

    async fn revoke_all(&self, account_id: Snowflake) -> Result<u32, DomainError> {
        let mut state = self.state();
        let before = state.refresh_sessions.len();
        state.refresh_sessions.retain(|_, id| *id != account_id);
        Ok((before - state.refresh_sessions.len()) as u32)
    }
}

// ============================================================================
// Clock and sink
// ============================================================================

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Notification>>,
    failing: Mutex<bool>,
}

impl RecordingSink {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn fail(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn dispatch(&self, notification: &Notification) -> Result<(), DomainError> {
        if *self.failing.lock().unwrap() {
            return Err(DomainError::CacheError("sink offline".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

// ============================================================================
// World
// ============================================================================

/// Noon UTC on the given day
pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A service context wired to in-memory ports, plus seeding helpers
pub struct TestWorld {
    pub ctx: ServiceContext,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub sink: Arc<RecordingSink>,
    ids: Arc<SnowflakeGenerator>,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::build(false)
    }

    pub fn auto_activating() -> Self {
        Self::build(true)
    }

    fn build(auto_activate: bool) -> Self {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(FixedClock::new(noon(2024, 1, 15)));
        let sink = Arc::new(RecordingSink::default());
        let ids = Arc::new(SnowflakeGenerator::new(1));

        let ctx = ServiceContext::builder()
            .account_repo(store.clone())
            .group_repo(store.clone())
            .membership_repo(store.clone())
            .content_repo(store.clone())
            .poll_repo(store.clone())
            .event_repo(store.clone())
            .activation_tokens(store.clone())
            .refresh_sessions(store.clone())
            .notifications(sink.clone())
            .clock(clock.clone())
            .jwt_service(Arc::new(JwtService::new("test-secret", 900, 604_800)))
            .snowflake_generator(ids.clone())
            .auto_activate(auto_activate)
            .build()
            .unwrap();

        Self {
            ctx,
            store,
            clock,
            sink,
            ids,
        }
    }

    pub fn next_id(&self) -> Snowflake {
        self.ids.generate()
    }

    /// An activated account without a usable password
    pub async fn account(&self, username: &str) -> Snowflake {
        let mut account = Account::new(
            self.next_id(),
            username.to_string(),
            format!("{username}@example.com"),
        );
        account.activate();
        AccountRepository::create(self.store.as_ref(), &account, "unused")
            .await
            .unwrap();
        account.id
    }

    /// A group owned by `owner`, who is its only admin
    pub async fn group(&self, owner: Snowflake, privacy: Privacy) -> Snowflake {
        let group = Group::new(self.next_id(), format!("group-{owner}"), privacy, owner);
        GroupRepository::create(self.store.as_ref(), &group).await.unwrap();
        group.id
    }

    /// Approved membership
    pub async fn member(&self, group_id: Snowflake, account_id: Snowflake) {
        let membership = Membership::request(group_id, account_id, Privacy::Public);
        self.store
            .state()
            .memberships
            .insert((group_id, account_id), membership);
    }

    /// Pending membership
    pub async fn pending(&self, group_id: Snowflake, account_id: Snowflake) {
        let membership = Membership::request(group_id, account_id, Privacy::Private);
        self.store
            .state()
            .memberships
            .insert((group_id, account_id), membership);
    }

    pub async fn suspend(&self, group_id: Snowflake, account_id: Snowflake) {
        if let Some(m) = self.store.state().memberships.get_mut(&(group_id, account_id)) {
            m.is_suspended = true;
        }
    }

    /// Approved membership plus a seat in the admin set
    pub async fn admin(&self, group_id: Snowflake, account_id: Snowflake) {
        self.member(group_id, account_id).await;
        self.store
            .state()
            .admins
            .entry(group_id)
            .or_default()
            .push(account_id);
    }

    pub fn membership(&self, group_id: Snowflake, account_id: Snowflake) -> Option<Membership> {
        self.store
            .state()
            .memberships
            .get(&(group_id, account_id))
            .cloned()
    }

    pub fn admin_ids(&self, group_id: Snowflake) -> Vec<Snowflake> {
        self.store
            .state()
            .admins
            .get(&group_id)
            .cloned()
            .unwrap_or_default()
    }

    /// A shown post by `author` in `group_id`
    pub async fn post(&self, group_id: Snowflake, author: Snowflake) -> Snowflake {
        let post = Post::new(
            self.next_id(),
            group_id,
            author,
            "Hello world".to_string(),
            "First post".to_string(),
        );
        self.store.state().posts.insert(post.id, post.clone());
        post.id
    }

    pub async fn comment(&self, post_id: Snowflake, author: Snowflake) -> Snowflake {
        let comment = Comment::new(self.next_id(), post_id, author, "Nice".to_string());
        self.store.state().comments.insert(comment.id, comment.clone());
        comment.id
    }

    pub async fn reply(&self, comment_id: Snowflake, author: Snowflake) -> Snowflake {
        let reply = Reply::new(self.next_id(), comment_id, author, "Thanks".to_string());
        self.store.state().replies.insert(reply.id, reply.clone());
        reply.id
    }

    pub fn set_now(&self, now: DateTime<Utc>) {
        self.clock.set(now);
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.sink.sent()
    }

    /// Verbs of every notification sent so far
    pub fn verbs(&self) -> Vec<String> {
        self.sink.sent().into_iter().map(|n| n.verb).collect()
    }
}
