use crate::{Error, StoredSession, User, UserId};
use async_trait::async_trait;

/// Repository for session data access
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Insert the user's session, replacing the token hash if one already exists
    async fn upsert(&self, user_id: &UserId, token_hash: &str) -> Result<StoredSession, Error>;

    /// Find a session and its owner by token hash
    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredSession, User)>, Error>;

    /// Delete a session by token hash; deleting a missing session is not an error
    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), Error>;
}
