//! Membership entity - the join record between an account and a group
//!
//! States: `none -> pending (private groups only) -> approved`, and
//! independently `approved <-> suspended`. A membership is deleted on leave,
//! removal or rejection, which returns the pair to `none`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Privacy;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub group_id: Snowflake,
    pub account_id: Snowflake,
    pub is_approved: bool,
    pub is_suspended: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived state of a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipState {
    Pending,
    Active,
    Suspended,
}

impl Membership {
    /// Membership created by a join request: approved at once for public
    /// groups, pending for private ones
    pub fn request(group_id: Snowflake, account_id: Snowflake, privacy: Privacy) -> Self {
        let now = Utc::now();
        Self {
            group_id,
            account_id,
            is_approved: !privacy.requires_approval(),
            is_suspended: false,
            joined_at: now,
            updated_at: now,
        }
    }

    /// Membership granted to a group's creator
    pub fn owner(group_id: Snowflake, account_id: Snowflake) -> Self {
        Self::request(group_id, account_id, Privacy::Public)
    }

    pub fn state(&self) -> MembershipState {
        match (self.is_approved, self.is_suspended) {
            (false, _) => MembershipState::Pending,
            (true, false) => MembershipState::Active,
            (true, true) => MembershipState::Suspended,
        }
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.is_approved
    }

    /// Approved and not suspended
    #[inline]
    pub fn is_active(&self) -> bool {
        self.is_approved && !self.is_suspended
    }

    pub fn approve(&mut self) {
        self.is_approved = true;
        self.updated_at = Utc::now();
    }

    /// Flip the suspension flag and return the new value
    pub fn toggle_suspension(&mut self) -> bool {
        self.is_suspended = !self.is_suspended;
        self.updated_at = Utc::now();
        self.is_suspended
    }
}

/// Explicit member-list predicate chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberFilter {
    #[default]
    Active,
    Suspended,
    Pending,
}

impl MemberFilter {
    pub fn admits(self, membership: &Membership) -> bool {
        match self {
            Self::Active => membership.state() == MembershipState::Active,
            Self::Suspended => membership.state() == MembershipState::Suspended,
            Self::Pending => membership.state() == MembershipState::Pending,
        }
    }

    /// `(is_approved, is_suspended)` columns selected by this filter
    pub fn flags(self) -> (bool, Option<bool>) {
        match self {
            Self::Active => (true, Some(false)),
            Self::Suspended => (true, Some(true)),
            Self::Pending => (false, None),
        }
    }
}
