//! Service context - dependency container for services
//!
//! Holds the repository ports, token stores, notification sink and clock.
//! Everything is behind a trait object so tests can swap in in-memory
//! implementations.

use std::sync::Arc;

use community_common::auth::JwtService;
use community_core::events::Notification;
use community_core::traits::{
    AccountRepository, ActivationTokens, Clock, ContentRepository, EventRepository,
    GroupRepository, MembershipRepository, NotificationSink, PollRepository, RefreshSessions,
    SystemClock,
};
use community_core::{Snowflake, SnowflakeGenerator};
use tracing::warn;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    group_repo: Arc<dyn GroupRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    content_repo: Arc<dyn ContentRepository>,
    poll_repo: Arc<dyn PollRepository>,
    event_repo: Arc<dyn EventRepository>,

    // Token stores
    activation_tokens: Arc<dyn ActivationTokens>,
    refresh_sessions: Arc<dyn RefreshSessions>,

    notifications: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,

    /// Skip the activation step on registration
    auto_activate: bool,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn group_repo(&self) -> &dyn GroupRepository {
        self.group_repo.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    pub fn content_repo(&self) -> &dyn ContentRepository {
        self.content_repo.as_ref()
    }

    pub fn poll_repo(&self) -> &dyn PollRepository {
        self.poll_repo.as_ref()
    }

    pub fn event_repo(&self) -> &dyn EventRepository {
        self.event_repo.as_ref()
    }

    // === Token Stores ===

    pub fn activation_tokens(&self) -> &dyn ActivationTokens {
        self.activation_tokens.as_ref()
    }

    pub fn refresh_sessions(&self) -> &dyn RefreshSessions {
        self.refresh_sessions.as_ref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn auto_activate(&self) -> bool {
        self.auto_activate
    }

    /// Hand a notification to the sink. Delivery problems are logged and
    /// never fail the calling operation.
    pub async fn notify(&self, notification: Notification) {
        if !notification.has_recipients() {
            return;
        }
        if let Err(e) = self.notifications.dispatch(&notification).await {
            warn!(
                verb = %notification.verb,
                sender = %notification.sender,
                error = %e,
                "Failed to dispatch notification"
            );
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("token_stores", &"...")
            .field("auto_activate", &self.auto_activate)
            .finish()
    }
}

/// Builder for creating ServiceContext
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    group_repo: Option<Arc<dyn GroupRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    content_repo: Option<Arc<dyn ContentRepository>>,
    poll_repo: Option<Arc<dyn PollRepository>>,
    event_repo: Option<Arc<dyn EventRepository>>,
    activation_tokens: Option<Arc<dyn ActivationTokens>>,
    refresh_sessions: Option<Arc<dyn RefreshSessions>>,
    notifications: Option<Arc<dyn NotificationSink>>,
    clock: Option<Arc<dyn Clock>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    auto_activate: bool,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            account_repo: None,
            group_repo: None,
            membership_repo: None,
            content_repo: None,
            poll_repo: None,
            event_repo: None,
            activation_tokens: None,
            refresh_sessions: None,
            notifications: None,
            clock: None,
            jwt_service: None,
            snowflake_generator: None,
            auto_activate: false,
        }
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn group_repo(mut self, repo: Arc<dyn GroupRepository>) -> Self {
        self.group_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn content_repo(mut self, repo: Arc<dyn ContentRepository>) -> Self {
        self.content_repo = Some(repo);
        self
    }

    pub fn poll_repo(mut self, repo: Arc<dyn PollRepository>) -> Self {
        self.poll_repo = Some(repo);
        self
    }

    pub fn event_repo(mut self, repo: Arc<dyn EventRepository>) -> Self {
        self.event_repo = Some(repo);
        self
    }

    pub fn activation_tokens(mut self, store: Arc<dyn ActivationTokens>) -> Self {
        self.activation_tokens = Some(store);
        self
    }

    pub fn refresh_sessions(mut self, store: Arc<dyn RefreshSessions>) -> Self {
        self.refresh_sessions = Some(store);
        self
    }

    pub fn notifications(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.notifications = Some(sink);
        self
    }

    /// Defaults to [`SystemClock`]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn auto_activate(mut self, enabled: bool) -> Self {
        self.auto_activate = enabled;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            account_repo: required(self.account_repo, "account_repo")?,
            group_repo: required(self.group_repo, "group_repo")?,
            membership_repo: required(self.membership_repo, "membership_repo")?,
            content_repo: required(self.content_repo, "content_repo")?,
            poll_repo: required(self.poll_repo, "poll_repo")?,
            event_repo: required(self.event_repo, "event_repo")?,
            activation_tokens: required(self.activation_tokens, "activation_tokens")?,
            refresh_sessions: required(self.refresh_sessions, "refresh_sessions")?,
            notifications: required(self.notifications, "notifications")?,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            jwt_service: required(self.jwt_service, "jwt_service")?,
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            auto_activate: self.auto_activate,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
