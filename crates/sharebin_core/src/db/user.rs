//! User storage operations keyed by bearer token.

use super::{read_table, write_table};
use crate::{
    config::AdminConfig, constants::ADMIN_USER_ID, error::AppError, ids, models::user::User,
};
use std::collections::HashMap;
use std::sync::RwLock;

const TABLE: &str = "users";

#[derive(Default)]
struct UserTable {
    by_id: HashMap<i64, User>,
    /// Bearer token -> user id.
    by_token: HashMap<String, i64>,
}

/// Accessor for stored users.
#[derive(Default)]
pub struct UserDb {
    inner: RwLock<UserTable>,
}

impl UserDb {
    /// Insert a user.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the id or token is already taken.
    pub fn insert(&self, user: User) -> Result<(), AppError> {
        let mut table = write_table(&self.inner, TABLE)?;
        if table.by_id.contains_key(&user.id) || table.by_token.contains_key(&user.token) {
            return Err(AppError::Conflict(format!(
                "User id '{}' already exists",
                user.id
            )));
        }
        table.by_token.insert(user.token.clone(), user.id);
        table.by_id.insert(user.id, user);
        Ok(())
    }

    /// Create the administrator account described by `admin`.
    ///
    /// # Returns
    /// `Ok(false)` when no token is configured and nothing was created.
    ///
    /// # Errors
    /// Returns [`AppError::Conflict`] when the account already exists.
    pub fn seed_admin(&self, admin: &AdminConfig) -> Result<bool, AppError> {
        let Some(token) = admin.token.as_deref() else {
            return Ok(false);
        };
        self.insert(User::with_token(
            ADMIN_USER_ID,
            admin.username.as_str(),
            true,
            token,
        ))?;
        Ok(true)
    }

    /// Look up the user owning `token`.
    pub fn get_by_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let table = read_table(&self.inner, TABLE)?;
        Ok(table
            .by_token
            .get(token)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    /// Replace the token of the user owning `token`.
    ///
    /// The old token stops resolving immediately.
    ///
    /// # Returns
    /// The new token, or `Ok(None)` when `token` is unknown.
    pub fn regenerate_token(&self, token: &str) -> Result<Option<String>, AppError> {
        let mut table = write_table(&self.inner, TABLE)?;
        let Some(id) = table.by_token.remove(token) else {
            return Ok(None);
        };
        let fresh = ids::generate_user_token();
        table.by_token.insert(fresh.clone(), id);
        match table.by_id.get_mut(&id) {
            Some(user) => {
                user.token = fresh.clone();
                Ok(Some(fresh))
            }
            None => {
                table.by_token.remove(&fresh);
                Err(AppError::StorageMessage(format!(
                    "Token index points at missing user '{}'",
                    id
                )))
            }
        }
    }
}
