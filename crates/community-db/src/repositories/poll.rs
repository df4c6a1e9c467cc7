//! PostgreSQL implementation of PollRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use community_core::entities::{Choice, Poll, Vote};
use community_core::error::DomainError;
use community_core::traits::{PollRepository, RepoResult};
use community_core::value_objects::Snowflake;

use crate::models::{ChoiceModel, PollModel, VoteModel};

use super::error::{
    is_foreign_key_violation, map_constraint_violation, map_db_error, map_foreign_key_violation,
};

#[derive(Clone)]
pub struct PgPollRepository {
    pool: PgPool,
}

impl PgPollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_choices(
        tx: &mut Transaction<'_, Postgres>,
        choices: &[Choice],
    ) -> RepoResult<()> {
        for choice in choices {
            sqlx::query(
                "INSERT INTO choices (id, poll_id, text, position, votes) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(choice.id.into_inner())
            .bind(choice.poll_id.into_inner())
            .bind(&choice.text)
            .bind(choice.position)
            .bind(choice.votes)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?;
        }
        Ok(())
    }
}

fn duplicate_vote(constraint: Option<&str>) -> Option<DomainError> {
    match constraint {
        Some("votes_pkey") => Some(DomainError::AlreadyVoted),
        _ => None,
    }
}

/// The row a vote referenced that no longer exists
fn missing_vote_target(constraint: Option<&str>, vote: &Vote) -> Option<DomainError> {
    match constraint {
        Some("votes_choice_id_fkey") => Some(DomainError::ChoiceNotFound),
        Some("votes_poll_id_fkey") => Some(DomainError::PollNotFound(vote.poll_id)),
        Some("votes_voter_id_fkey") => Some(DomainError::AccountNotFound(vote.voter_id)),
        _ => None,
    }
}

#[async_trait]
impl PollRepository for PgPollRepository {
    #[instrument(skip(self, poll, choices), fields(poll_id = %poll.id, choices = choices.len()))]
    async fn create(&self, poll: &Poll, choices: &[Choice]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO polls (id, group_id, author_id, question, start_date, end_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(poll.id.into_inner())
        .bind(poll.group_id.into_inner())
        .bind(poll.author_id.into_inner())
        .bind(&poll.question)
        .bind(poll.start_date)
        .bind(poll.end_date)
        .bind(poll.created_at)
        .bind(poll.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::GroupNotFound(poll.group_id)
            } else {
                map_db_error(e)
            }
        })?;

        Self::insert_choices(&mut tx, choices).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Poll>> {
        let result = sqlx::query_as::<_, PollModel>(
            r"
            SELECT id, group_id, author_id, question, start_date, end_date, created_at, updated_at
            FROM polls
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Poll::from))
    }

    #[instrument(skip(self))]
    async fn find_by_group(&self, group_id: Snowflake) -> RepoResult<Vec<Poll>> {
        let results = sqlx::query_as::<_, PollModel>(
            r"
            SELECT id, group_id, author_id, question, start_date, end_date, created_at, updated_at
            FROM polls
            WHERE group_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(group_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Poll::from).collect())
    }

    #[instrument(skip(self))]
    async fn choices(&self, poll_id: Snowflake) -> RepoResult<Vec<Choice>> {
        let results = sqlx::query_as::<_, ChoiceModel>(
            "SELECT id, poll_id, text, position, votes FROM choices WHERE poll_id = $1 ORDER BY position",
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Choice::from).collect())
    }

    #[instrument(skip(self, poll, choices), fields(poll_id = %poll.id, choices = choices.len()))]
    async fn replace(&self, poll: &Poll, choices: &[Choice]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Holding the poll row blocks vote inserts until the edit commits
        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM polls WHERE id = $1 FOR UPDATE")
            .bind(poll.id.into_inner())
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?;
        if locked.is_none() {
            return Err(DomainError::PollNotFound(poll.id));
        }

        let has_votes = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM votes WHERE poll_id = $1)",
        )
        .bind(poll.id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;
        if has_votes {
            return Err(DomainError::PollLocked);
        }

        sqlx::query(
            r"
            UPDATE polls
            SET question = $2, start_date = $3, end_date = $4, updated_at = $5
            WHERE id = $1
            ",
        )
        .bind(poll.id.into_inner())
        .bind(&poll.question)
        .bind(poll.start_date)
        .bind(poll.end_date)
        .bind(poll.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("DELETE FROM choices WHERE poll_id = $1")
            .bind(poll.id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        Self::insert_choices(&mut tx, choices).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM polls WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PollNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_vote(&self, poll_id: Snowflake, voter_id: Snowflake) -> RepoResult<Option<Vote>> {
        let result = sqlx::query_as::<_, VoteModel>(
            r"
            SELECT poll_id, voter_id, choice_id, created_at
            FROM votes
            WHERE poll_id = $1 AND voter_id = $2
            ",
        )
        .bind(poll_id.into_inner())
        .bind(voter_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Vote::from))
    }

    #[instrument(skip(self, poll_ids), fields(polls = poll_ids.len()))]
    async fn voted_in(
        &self,
        voter_id: Snowflake,
        poll_ids: &[Snowflake],
    ) -> RepoResult<Vec<Snowflake>> {
        if poll_ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = poll_ids.iter().map(|id| id.into_inner()).collect();

        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT poll_id FROM votes WHERE voter_id = $1 AND poll_id = ANY($2)",
        )
        .bind(voter_id.into_inner())
        .bind(&raw)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self, vote), fields(poll_id = %vote.poll_id, voter_id = %vote.voter_id))]
    async fn cast_vote(&self, vote: &Vote) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The primary key is the arbiter: a concurrent second insert for the
        // same (poll, voter) waits on the first and then fails here.
        sqlx::query(
            r"
            INSERT INTO votes (poll_id, voter_id, choice_id, created_at)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(vote.poll_id.into_inner())
        .bind(vote.voter_id.into_inner())
        .bind(vote.choice_id.into_inner())
        .bind(vote.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_foreign_key_violation(
                e,
                |constraint| missing_vote_target(constraint, vote),
                |e| map_constraint_violation(e, duplicate_vote),
            )
        })?;

        let updated = sqlx::query("UPDATE choices SET votes = votes + 1 WHERE id = $1 AND poll_id = $2")
            .bind(vote.choice_id.into_inner())
            .bind(vote.poll_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            debug!("Choice does not belong to poll, rolling back");
            tx.rollback().await.map_err(map_db_error)?;
            return Err(DomainError::ChoiceNotFound);
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }
}
