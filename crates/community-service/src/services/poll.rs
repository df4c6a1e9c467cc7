//! Poll service
//!
//! Poll authoring, results, and vote casting.
//!
//! Vote preconditions are checked in a fixed order and the first failure
//! wins: eligibility, window start, window end, existing vote. The final
//! write is one storage transaction in which the (poll, voter) key is the
//! arbiter, so a racing second vote surfaces as `AlreadyVoted` as well.

use std::collections::HashSet;

use community_core::entities::{Choice, Poll, Vote};
use community_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CastVoteRequest, ChoiceResponse, PollRequest, PollResponse, PollResultsResponse, PollView,
    VoteResponse,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

const MIN_CHOICES: usize = 2;
const MAX_CHOICES: usize = 10;

pub struct PollService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PollService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn access(&self) -> AccessService<'a> {
        AccessService::new(self.ctx)
    }

    async fn load_poll(&self, poll_id: Snowflake) -> ServiceResult<Poll> {
        let poll = self
            .ctx
            .poll_repo()
            .find_by_id(poll_id)
            .await?
            .ok_or(DomainError::PollNotFound(poll_id))?;
        Ok(poll)
    }

    /// Trimmed choice texts, checked for count, blanks and duplicates
    fn normalize_choices(choices: Vec<String>) -> ServiceResult<Vec<String>> {
        let choices: Vec<String> = choices.into_iter().map(|c| c.trim().to_string()).collect();

        if !(MIN_CHOICES..=MAX_CHOICES).contains(&choices.len()) {
            return Err(ServiceError::validation(format!(
                "A poll needs {MIN_CHOICES}-{MAX_CHOICES} choices"
            )));
        }
        if choices.iter().any(String::is_empty) {
            return Err(ServiceError::validation("Choices must not be blank"));
        }

        let mut seen = HashSet::new();
        if !choices.iter().all(|c| seen.insert(c.to_lowercase())) {
            return Err(ServiceError::validation("Choices must be unique"));
        }
        Ok(choices)
    }

    fn build_choices(&self, poll_id: Snowflake, texts: Vec<String>) -> Vec<Choice> {
        texts
            .into_iter()
            .zip(0..)
            .map(|(text, position)| Choice::new(self.ctx.generate_id(), poll_id, text, position))
            .collect()
    }

    /// Create a poll with its choices. Admins only.
    #[instrument(skip(self, request))]
    pub async fn create_poll(
        &self,
        group_id: Snowflake,
        actor_id: Snowflake,
        request: PollRequest,
    ) -> ServiceResult<PollResponse> {
        self.access().load_group(group_id).await?;
        self.access().require_admin(group_id, actor_id).await?;

        Poll::validate_window(request.start_date, request.end_date)?;
        let texts = Self::normalize_choices(request.choices)?;

        let poll = Poll::new(
            self.ctx.generate_id(),
            group_id,
            actor_id,
            request.question.trim().to_string(),
            request.start_date,
            request.end_date,
        );
        let choices = self.build_choices(poll.id, texts);

        self.ctx.poll_repo().create(&poll, &choices).await?;

        info!(poll_id = %poll.id, group_id = %group_id, "Poll created");

        Ok(PollResponse::from(PollView {
            poll: &poll,
            choices: &choices,
            today: self.ctx.clock().today(),
            has_voted: false,
        }))
    }

    /// Replace question, window and choices. Admins only, and only while
    /// nobody has voted.
    #[instrument(skip(self, request))]
    pub async fn update_poll(
        &self,
        poll_id: Snowflake,
        actor_id: Snowflake,
        request: PollRequest,
    ) -> ServiceResult<PollResponse> {
        let mut poll = self.load_poll(poll_id).await?;
        self.access().require_admin(poll.group_id, actor_id).await?;

        Poll::validate_window(request.start_date, request.end_date)?;
        let texts = Self::normalize_choices(request.choices)?;

        poll.reschedule(
            request.question.trim().to_string(),
            request.start_date,
            request.end_date,
        );
        let choices = self.build_choices(poll_id, texts);

        self.ctx.poll_repo().replace(&poll, &choices).await?;

        info!(poll_id = %poll_id, "Poll updated");

        Ok(PollResponse::from(PollView {
            poll: &poll,
            choices: &choices,
            today: self.ctx.clock().today(),
            has_voted: false,
        }))
    }

    /// Delete a poll and its votes. Admins only.
    #[instrument(skip(self))]
    pub async fn delete_poll(&self, poll_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let poll = self.load_poll(poll_id).await?;
        self.access().require_admin(poll.group_id, actor_id).await?;

        self.ctx.poll_repo().delete(poll_id).await?;

        info!(poll_id = %poll_id, "Poll deleted");

        Ok(())
    }

    /// Polls of a group with their status and whether the viewer voted.
    /// Members only.
    #[instrument(skip(self))]
    pub async fn list_polls(
        &self,
        group_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<Vec<PollResponse>> {
        self.access().load_group(group_id).await?;
        self.access().require_member(group_id, viewer_id).await?;

        let polls = self.ctx.poll_repo().find_by_group(group_id).await?;
        let poll_ids: Vec<Snowflake> = polls.iter().map(|p| p.id).collect();
        let voted: HashSet<Snowflake> = self
            .ctx
            .poll_repo()
            .voted_in(viewer_id, &poll_ids)
            .await?
            .into_iter()
            .collect();
        let today = self.ctx.clock().today();

        let mut responses = Vec::with_capacity(polls.len());
        for poll in &polls {
            let choices = self.ctx.poll_repo().choices(poll.id).await?;
            responses.push(PollResponse::from(PollView {
                poll,
                choices: &choices,
                today,
                has_voted: voted.contains(&poll.id),
            }));
        }
        Ok(responses)
    }

    /// Choices in order with their counters. Members only.
    #[instrument(skip(self))]
    pub async fn get_results(
        &self,
        poll_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<PollResultsResponse> {
        let poll = self.load_poll(poll_id).await?;
        self.access().require_member(poll.group_id, viewer_id).await?;

        let choices = self.ctx.poll_repo().choices(poll_id).await?;
        let total_votes = choices.iter().map(|c| c.votes).sum();

        Ok(PollResultsResponse {
            poll_id: poll_id.to_string(),
            question: poll.question.clone(),
            status: poll.status(self.ctx.clock().today()),
            choices: choices.iter().map(ChoiceResponse::from).collect(),
            total_votes,
        })
    }

    /// Cast the voter's single vote in a poll
    #[instrument(skip(self, request), fields(choice_id = %request.choice_id))]
    pub async fn cast_vote(
        &self,
        poll_id: Snowflake,
        voter_id: Snowflake,
        request: CastVoteRequest,
    ) -> ServiceResult<VoteResponse> {
        let poll = self.load_poll(poll_id).await?;

        // 1. only active members are eligible
        let eligible = self
            .access()
            .membership(poll.group_id, voter_id)
            .await?
            .is_some_and(|m| m.is_active());
        if !eligible {
            return Err(DomainError::NotEligible.into());
        }

        // 2-3. voting window
        poll.ensure_open(self.ctx.clock().today())?;

        // 4. existing vote
        if self
            .ctx
            .poll_repo()
            .find_vote(poll_id, voter_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyVoted.into());
        }

        // 5. vote row and counter as one unit
        let vote = Vote::new(poll_id, voter_id, request.choice_id);
        self.ctx.poll_repo().cast_vote(&vote).await?;

        info!(poll_id = %poll_id, voter_id = %voter_id, "Vote cast");

        Ok(VoteResponse {
            poll_id: poll_id.to_string(),
            choice_id: vote.choice_id.to_string(),
            created_at: vote.created_at,
        })
    }
}
