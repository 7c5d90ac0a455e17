//! Session-stored admin identity.

use serde::{Deserialize, Serialize};

use jagmart_core::{Email, User, UserId};

/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    pub id: UserId,
    pub email: Email,
    /// Display name, falling back to the email.
    pub name: String,
}

impl From<&User> for CurrentAdmin {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.display_name(),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    pub const CURRENT_ADMIN: &str = "current_admin";
}
