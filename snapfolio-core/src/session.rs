//! Sessions
//!
//! A session ties a browser to a user through a random token. The raw token lives
//! in the user's cookie, storage only ever sees its hash. Each user has at most
//! one session row, so signing in again invalidates the previous token.
use serde::{Deserialize, Serialize};

use crate::{RawToken, UserId};

/// A freshly created session, the only place the raw token is available.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: UserId,
    pub token: RawToken,
    pub token_hash: String,
}

impl Session {
    pub fn from_stored(stored: StoredSession, token: RawToken) -> Self {
        Self {
            id: stored.id,
            user_id: stored.user_id,
            token,
            token_hash: stored.token_hash,
        }
    }
}

/// A session row as storage returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: i64,
    pub user_id: UserId,
    pub token_hash: String,
}
