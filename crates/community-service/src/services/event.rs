//! Event service
//!
//! Group events and RSVP answers.

use community_core::entities::{Event, EventSchedule, MemberFilter, Rsvp, RsvpSummary};
use community_core::events::{Notification, NotificationTarget};
use community_core::traits::Page;
use community_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use crate::dto::{
    CreateEventRequest, EventAt, EventDetailResponse, EventListResponse, EventResponse,
    RsvpAnswerResponse, RsvpRequest, UpdateEventRequest,
};

use super::access::AccessService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    fn access(&self) -> AccessService<'a> {
        AccessService::new(self.ctx)
    }

    async fn load_event(&self, event_id: Snowflake) -> ServiceResult<Event> {
        let event = self
            .ctx
            .event_repo()
            .find_by_id(event_id)
            .await?
            .ok_or(DomainError::EventNotFound(event_id))?;
        Ok(event)
    }

    /// Active members of the group, who count as invited
    async fn invitees(&self, group_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        let members = self
            .ctx
            .membership_repo()
            .list(group_id, MemberFilter::Active, Page::all())
            .await?;
        Ok(members.into_iter().map(|m| m.account_id).collect())
    }

    /// Schedule an event and invite every active member. Admins only.
    #[instrument(skip(self, request))]
    pub async fn create_event(
        &self,
        group_id: Snowflake,
        host_id: Snowflake,
        request: CreateEventRequest,
    ) -> ServiceResult<EventResponse> {
        let group = self.access().load_group(group_id).await?;
        self.access().require_admin(group_id, host_id).await?;

        let now = self.ctx.clock().now();
        Event::validate_times(request.start_at, request.end_at, now)?;

        let event = Event::new(
            self.ctx.generate_id(),
            group_id,
            host_id,
            request.name.trim().to_string(),
            request.description.trim().to_string(),
            request.location.trim().to_string(),
            request.start_at,
            request.end_at,
        );
        self.ctx.event_repo().create(&event).await?;

        info!(event_id = %event.id, group_id = %group_id, "Event created");

        let invitees = self.invitees(group_id).await?;
        self.ctx
            .notify(
                Notification::new(
                    host_id,
                    format!("invited you to {}", event.name),
                    NotificationTarget::Event(event.id),
                )
                .to_all(invitees)
                .with_description(group.name)
                .excluding_sender(),
            )
            .await;

        Ok(EventResponse::from(EventAt { event: &event, now }))
    }

    /// Change any subset of the event's fields. Admins only, and never
    /// while the event is in progress.
    #[instrument(skip(self, request))]
    pub async fn update_event(
        &self,
        event_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateEventRequest,
    ) -> ServiceResult<EventResponse> {
        let mut event = self.load_event(event_id).await?;
        self.access().require_admin(event.group_id, actor_id).await?;

        let now = self.ctx.clock().now();
        if !event.is_editable(now) {
            return Err(DomainError::EventLocked.into());
        }

        if request.start_at.is_some() || request.end_at.is_some() {
            let start_at = request.start_at.unwrap_or(event.start_at);
            let end_at = request.end_at.unwrap_or(event.end_at);
            Event::validate_times(start_at, end_at, now)?;
            event.reschedule(start_at, end_at);
        }

        if let Some(name) = request.name {
            event.rename(name.trim().to_string());
        }

        event.set_details(
            request.description.map(|d| d.trim().to_string()),
            request.location.map(|l| l.trim().to_string()),
        );

        self.ctx.event_repo().update(&event).await?;

        info!(event_id = %event_id, actor_id = %actor_id, "Event updated");

        Ok(EventResponse::from(EventAt { event: &event, now }))
    }

    /// Admins only
    #[instrument(skip(self))]
    pub async fn delete_event(&self, event_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let event = self.load_event(event_id).await?;
        self.access().require_admin(event.group_id, actor_id).await?;

        self.ctx.event_repo().delete(event_id).await?;

        info!(event_id = %event_id, "Event deleted");

        Ok(())
    }

    /// Events of a group split into upcoming, ongoing and past
    #[instrument(skip(self))]
    pub async fn list_events(
        &self,
        group_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<EventListResponse> {
        self.access().load_group(group_id).await?;
        self.access().require_member(group_id, viewer_id).await?;

        let now = self.ctx.clock().now();
        let events = self.ctx.event_repo().find_by_group(group_id).await?;

        let mut list = EventListResponse::default();
        for event in &events {
            let response = EventResponse::from(EventAt { event, now });
            match response.schedule {
                EventSchedule::Upcoming => list.upcoming.push(response),
                EventSchedule::Ongoing => list.ongoing.push(response),
                EventSchedule::Past => list.past.push(response),
            }
        }
        Ok(list)
    }

    #[instrument(skip(self))]
    pub async fn get_event(
        &self,
        event_id: Snowflake,
        viewer_id: Snowflake,
    ) -> ServiceResult<EventDetailResponse> {
        let event = self.load_event(event_id).await?;
        self.access().require_member(event.group_id, viewer_id).await?;

        let rsvps = self.ctx.event_repo().rsvps(event_id).await?;
        let invited = i64::try_from(self.invitees(event.group_id).await?.len())
            .map_err(|_| ServiceError::internal("Invitee count overflow"))?;

        let my_response = rsvps
            .iter()
            .find(|r| r.account_id == viewer_id)
            .map(|r| r.response);
        let rsvp = RsvpSummary::tally(rsvps.iter().map(|r| r.response), invited);

        Ok(EventDetailResponse {
            event: EventResponse::from(EventAt {
                event: &event,
                now: self.ctx.clock().now(),
            }),
            rsvp,
            my_response,
        })
    }

    /// Record or change the member's answer. Finished events take no
    /// answers.
    #[instrument(skip(self, request))]
    pub async fn respond(
        &self,
        event_id: Snowflake,
        account_id: Snowflake,
        request: RsvpRequest,
    ) -> ServiceResult<RsvpAnswerResponse> {
        let event = self.load_event(event_id).await?;
        self.access()
            .require_active_member(event.group_id, account_id)
            .await?;

        if event.schedule(self.ctx.clock().now()) == EventSchedule::Past {
            return Err(ServiceError::validation("Event has already ended"));
        }

        let rsvp = Rsvp::new(event_id, account_id, request.response);
        self.ctx.event_repo().upsert_rsvp(&rsvp).await?;

        info!(
            event_id = %event_id,
            account_id = %account_id,
            response = rsvp.response.as_str(),
            "RSVP recorded"
        );

        Ok(RsvpAnswerResponse::from(&rsvp))
    }
}
