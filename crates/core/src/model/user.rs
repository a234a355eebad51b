use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// An account identified by email, created on first login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds a new user with a fresh id, deriving the display name from the
    /// local part of the email.
    #[must_use]
    pub fn new(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        let email = email.into();
        let name = email.split('@').next().unwrap_or(email.as_str()).to_owned();
        Self {
            id: UserId::generate(),
            email,
            name,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn name_defaults_to_email_local_part() {
        let user = User::new("ada@example.edu", fixed_now());
        assert_eq!(user.name, "ada");
        assert_eq!(user.email, "ada@example.edu");
    }

    #[test]
    fn name_falls_back_to_full_email_without_at() {
        let user = User::new("ada", fixed_now());
        assert_eq!(user.name, "ada");
    }
}
