//! Account entity - a registered person on the platform

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Account entity.
///
/// New accounts start inactive and become usable once their activation
/// token is redeemed. Suspension is tracked per group on [`Membership`]
/// rather than here.
///
/// [`Membership`]: crate::entities::Membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Snowflake,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub bio: Option<String>,
    pub current_city: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, not yet activated account
    pub fn new(id: Snowflake, username: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            email,
            first_name: None,
            last_name: None,
            phone_number: None,
            bio: None,
            current_city: None,
            is_active: false,
            is_staff: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// "First Last" when both parts are known, otherwise whichever exists
    pub fn full_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(part), None) | (None, Some(part)) => Some(part.to_string()),
            (None, None) => None,
        }
    }

    /// Name shown in notifications
    pub fn display_name(&self) -> String {
        self.full_name().unwrap_or_else(|| self.username.clone())
    }

    pub fn activate(&mut self) {
        if !self.is_active {
            self.is_active = true;
            self.updated_at = Utc::now();
        }
    }

    pub fn set_names(&mut self, first_name: Option<String>, last_name: Option<String>) {
        self.first_name = first_name;
        self.last_name = last_name;
        self.updated_at = Utc::now();
    }

    pub fn set_contact(&mut self, phone_number: Option<String>, current_city: Option<String>) {
        self.phone_number = phone_number;
        self.current_city = current_city;
        self.updated_at = Utc::now();
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
        self.updated_at = Utc::now();
    }
}
