//! The signed-in session, persisted in the local cache.

use super::UserId;
use crate::cache::{self, CacheResult, LocalCache};
use std::fmt;

/// Access token and user id returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    token: String,
    user_id: UserId,
}

impl AuthSession {
    pub fn new(token: impl Into<String>, user_id: UserId) -> Self {
        Self {
            token: token.into(),
            user_id,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Reads the session from the cache.
    ///
    /// Returns `None` unless both the token and the user id are present.
    pub fn load<C: LocalCache>(cache: &C) -> CacheResult<Option<Self>> {
        let token = cache.get(cache::ACCESS_TOKEN)?;
        let user_id = cache.get(cache::USER_ID)?;
        Ok(match (token, user_id) {
            (Some(token), Some(user_id)) if !token.is_empty() && !user_id.is_empty() => {
                Some(Self::new(token, UserId::new(user_id)))
            }
            _ => None,
        })
    }

    /// Writes the session to the cache.
    pub fn store<C: LocalCache>(&self, cache: &mut C) -> CacheResult<()> {
        cache.set(cache::ACCESS_TOKEN, &self.token)?;
        cache.set(cache::USER_ID, self.user_id.as_str())
    }

    /// Removes any stored session. Logging out twice is harmless.
    pub fn clear<C: LocalCache>(cache: &mut C) -> CacheResult<()> {
        cache.remove(cache::ACCESS_TOKEN)?;
        cache.remove(cache::USER_ID)
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
