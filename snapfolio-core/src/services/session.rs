use crate::{
    Error, Session, TokenManager, User, UserId,
    crypto::constant_time_compare,
    error::TokenError,
    repositories::SessionRepository,
};
use std::sync::Arc;

/// Service for session management operations
///
/// Each user has at most one session. Creating a session for a user who already
/// has one replaces its token hash, so the old cookie stops working.
pub struct SessionService<R: SessionRepository> {
    repository: Arc<R>,
    token_manager: TokenManager,
}

impl<R: SessionRepository> SessionService<R> {
    /// Create a new SessionService with the given repository
    pub fn new(repository: Arc<R>, token_manager: TokenManager) -> Self {
        Self {
            repository,
            token_manager,
        }
    }

    /// Create or replace the session for a user
    pub async fn create(&self, user_id: &UserId) -> Result<Session, Error> {
        let (token, token_hash) = self.token_manager.generate()?;
        let stored = self.repository.upsert(user_id, &token_hash).await?;

        tracing::debug!(user_id = %user_id, session_id = stored.id, "Session created");
        Ok(Session::from_stored(stored, token))
    }

    /// Look up the user a raw session token belongs to
    ///
    /// A token with no matching session fails with [`TokenError::NotFound`].
    pub async fn user(&self, token: &str) -> Result<User, Error> {
        let token_hash = self.token_manager.hash(token);

        let Some((session, user)) = self.repository.find_by_token_hash(&token_hash).await? else {
            tracing::debug!("No session for presented token");
            return Err(Error::Token(TokenError::NotFound));
        };

        if !constant_time_compare(session.token_hash.as_bytes(), token_hash.as_bytes()) {
            return Err(Error::Token(TokenError::NotFound));
        }

        Ok(user)
    }

    /// Delete the session holding a raw token; unknown tokens are ignored
    pub async fn delete(&self, token: &str) -> Result<(), Error> {
        let token_hash = self.token_manager.hash(token);
        self.repository.delete_by_token_hash(&token_hash).await
    }
}
