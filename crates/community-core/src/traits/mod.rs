//! Ports - interfaces the domain needs from the outside world

mod ports;
mod repositories;

pub use ports::{ActivationTokens, Clock, NotificationSink, RefreshSessions, SystemClock};
pub use repositories::{
    AccountRepository, ContentRepository, EventRepository, GroupRepository, MembershipRepository,
    Page, PollRepository, RepoResult,
};
