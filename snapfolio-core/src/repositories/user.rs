use crate::{Error, NewUser, User, UserId};
use async_trait::async_trait;

/// Repository for user data access
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Create a new user, failing with `AuthError::EmailTaken` if the email is in use
    async fn create(&self, user: NewUser) -> Result<User, Error>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error>;

    /// Find a user by an already normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error>;

    /// Change a user's email; `None` if no such user exists
    async fn update_email(&self, id: &UserId, email: &str) -> Result<Option<User>, Error>;
}
