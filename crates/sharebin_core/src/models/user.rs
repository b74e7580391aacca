//! User records authenticated by bearer token.

use crate::ids;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A registered user.
///
/// The bearer token is never serialized; it is handed out only through
/// [`TokenResponse`].
#[derive(Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub token: String,
}

impl User {
    /// Create a user with a freshly generated bearer token.
    pub fn new(id: i64, username: impl Into<String>, admin: bool) -> Self {
        Self {
            id,
            username: username.into(),
            admin,
            created_at: Utc::now(),
            token: ids::generate_user_token(),
        }
    }

    /// Create a user holding an operator-supplied token.
    pub fn with_token(
        id: i64,
        username: impl Into<String>,
        admin: bool,
        token: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            ..Self::new(id, username, admin)
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("admin", &self.admin)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Response body for token regeneration.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}
