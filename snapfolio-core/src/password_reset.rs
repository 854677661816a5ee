//! Password resets
//!
//! A reset is a short-lived, single-use token mailed to the user. Like sessions,
//! only the token hash is stored and each user has at most one outstanding reset.
use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::{RawToken, UserId};

/// How long a reset token stays valid unless configured otherwise.
pub fn default_reset_duration() -> Duration {
    Duration::hours(1)
}

/// Longest reset lifetime accepted from configuration.
pub fn max_reset_duration() -> Duration {
    Duration::days(30)
}

/// Expiry of a reset issued at `now`, rounded up to a whole second.
///
/// Storage keeps whole seconds, so rounding up keeps the returned and stored
/// expiry equal without cutting the lifetime short. `None` if the result is
/// out of range.
pub fn reset_expires_at(now: DateTime<Utc>, duration: Duration) -> Option<DateTime<Utc>> {
    let expires_at = now.checked_add_signed(duration)?;
    let truncated = expires_at.trunc_subsecs(0);
    if truncated == expires_at {
        Some(expires_at)
    } else {
        truncated.checked_add_signed(Duration::seconds(1))
    }
}

/// A freshly created reset, carrying the raw token that goes into the email link.
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub id: i64,
    pub user_id: UserId,
    pub token: RawToken,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn from_stored(stored: StoredPasswordReset, token: RawToken) -> Self {
        Self {
            id: stored.id,
            user_id: stored.user_id,
            token,
            token_hash: stored.token_hash,
            expires_at: stored.expires_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPasswordReset {
    pub id: i64,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredPasswordReset {
    /// A reset is still usable at exactly `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
