use crate::{Error, StoredPasswordReset, User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository for password reset data access
#[async_trait]
pub trait PasswordResetRepository: Send + Sync + 'static {
    /// Insert the user's reset, replacing token hash and expiry if one already exists
    async fn upsert(
        &self,
        user_id: &UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredPasswordReset, Error>;

    /// Find a reset and its owner by token hash, regardless of expiry
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredPasswordReset, User)>, Error>;

    /// Delete a reset by ID
    async fn delete(&self, id: i64) -> Result<(), Error>;

    /// Delete every reset with `expires_at < now`, returning how many were removed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, Error>;
}
