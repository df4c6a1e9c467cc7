//! Group entity - a forum group with an owner and a bounded admin set

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Upper bound on the size of a group's admin set (owner included)
pub const MAX_GROUP_ADMINS: usize = 3;

/// Whether joining a group needs an admin's approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
}

impl Privacy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            _ => None,
        }
    }

    #[inline]
    pub fn requires_approval(self) -> bool {
        matches!(self, Self::Private)
    }
}

/// Group entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: Snowflake,
    pub name: String,
    pub description: Option<String>,
    pub privacy: Privacy,
    pub owner_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(id: Snowflake, name: String, privacy: Privacy, owner_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description: None,
            privacy,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_owner(&self, account_id: Snowflake) -> bool {
        self.owner_id == account_id
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.privacy.requires_approval()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_privacy(&mut self, privacy: Privacy) {
        self.privacy = privacy;
        self.updated_at = Utc::now();
    }
}

/// Snapshot of a group's admin set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupAdmins {
    ids: Vec<Snowflake>,
}

impl GroupAdmins {
    pub fn new(ids: Vec<Snowflake>) -> Self {
        Self { ids }
    }

    #[inline]
    pub fn contains(&self, account_id: Snowflake) -> bool {
        self.ids.contains(&account_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// No further admins can be added
    #[inline]
    pub fn is_full(&self) -> bool {
        self.ids.len() >= MAX_GROUP_ADMINS
    }

    /// `account_id` is an admin and nobody else is
    pub fn is_sole_admin(&self, account_id: Snowflake) -> bool {
        self.ids.len() <= 1 && self.contains(account_id)
    }

    pub fn ids(&self) -> &[Snowflake] {
        &self.ids
    }

    pub fn into_ids(self) -> Vec<Snowflake> {
        self.ids
    }
}
