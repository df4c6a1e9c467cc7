//! PostgreSQL implementation of EventRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use community_core::entities::{Event, Rsvp};
use community_core::error::DomainError;
use community_core::traits::{EventRepository, RepoResult};
use community_core::value_objects::Snowflake;

use crate::models::{EventModel, RsvpModel};

use super::error::{is_foreign_key_violation, map_db_error};

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn create(&self, event: &Event) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO events (id, group_id, host_id, name, slug, description, location,
                                start_at, end_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(event.id.into_inner())
        .bind(event.group_id.into_inner())
        .bind(event.host_id.into_inner())
        .bind(&event.name)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_at)
        .bind(event.end_at)
        .bind(event.created_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::GroupNotFound(event.group_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Event>> {
        let result = sqlx::query_as::<_, EventModel>(
            r"
            SELECT id, group_id, host_id, name, slug, description, location,
                   start_at, end_at, created_at, updated_at
            FROM events
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Event::from))
    }

    #[instrument(skip(self))]
    async fn find_by_group(&self, group_id: Snowflake) -> RepoResult<Vec<Event>> {
        let results = sqlx::query_as::<_, EventModel>(
            r"
            SELECT id, group_id, host_id, name, slug, description, location,
                   start_at, end_at, created_at, updated_at
            FROM events
            WHERE group_id = $1
            ORDER BY start_at DESC, id DESC
            ",
        )
        .bind(group_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Event::from).collect())
    }

    #[instrument(skip(self, event), fields(event_id = %event.id))]
    async fn update(&self, event: &Event) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE events
            SET name = $2, slug = $3, description = $4, location = $5,
                start_at = $6, end_at = $7, updated_at = $8
            WHERE id = $1
            ",
        )
        .bind(event.id.into_inner())
        .bind(&event.name)
        .bind(&event.slug)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_at)
        .bind(event.end_at)
        .bind(event.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(event.id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EventNotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self, rsvp), fields(event_id = %rsvp.event_id, account_id = %rsvp.account_id))]
    async fn upsert_rsvp(&self, rsvp: &Rsvp) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO event_rsvps (event_id, account_id, response, responded_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_id, account_id)
            DO UPDATE SET response = EXCLUDED.response, responded_at = EXCLUDED.responded_at
            ",
        )
        .bind(rsvp.event_id.into_inner())
        .bind(rsvp.account_id.into_inner())
        .bind(rsvp.response.as_str())
        .bind(rsvp.responded_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                DomainError::EventNotFound(rsvp.event_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn rsvps(&self, event_id: Snowflake) -> RepoResult<Vec<Rsvp>> {
        let results = sqlx::query_as::<_, RsvpModel>(
            r"
            SELECT event_id, account_id, response, responded_at
            FROM event_rsvps
            WHERE event_id = $1
            ORDER BY responded_at
            ",
        )
        .bind(event_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Rsvp::from).collect())
    }
}
