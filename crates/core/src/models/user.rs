//! Account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Email, RoleName, UserId};

/// A registered account, as shown to its owner and to admins.
///
/// The password hash never leaves the repository layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<RoleName>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Full name if either part is set, otherwise the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.email.to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: UserId::new(1),
            email: Email::parse("asha@example.com").unwrap(),
            first_name: first.map(str::to_owned),
            last_name: last.map(str::to_owned),
            role: Some(RoleName::Customer),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Asha"), Some("Rao")).display_name(), "Asha Rao");
        assert_eq!(user(Some("Asha"), None).display_name(), "Asha");
        assert_eq!(user(None, Some(" ")).display_name(), "asha@example.com");
    }
}
