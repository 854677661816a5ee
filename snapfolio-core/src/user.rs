//! User accounts
//!
//! | Field        | Type       | Description                                  |
//! | ------------ | ---------- | -------------------------------------------- |
//! | `id`         | `UserId`   | Numeric row id assigned by storage.          |
//! | `email`      | `String`   | Lowercased, unique email address.            |
//! | `created_at` | `DateTime` | The timestamp when the user was created.     |
//! | `updated_at` | `DateTime` | The timestamp when the user was last updated. |
//!
//! The password hash is deliberately not part of [`User`]; it is only reachable
//! through [`crate::repositories::PasswordRepository`].
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        UserId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything storage needs to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
