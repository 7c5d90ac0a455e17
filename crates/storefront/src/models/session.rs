//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use jagmart_core::{Email, User, UserId};

/// Session-stored shopper identity.
///
/// Only what is needed to authorize cart requests; the full profile is read
/// from the database when asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    pub const CURRENT_USER: &str = "current_user";
}
