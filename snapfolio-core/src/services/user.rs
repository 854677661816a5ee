use crate::{
    Error, User, UserId,
    error::AuthError,
    repositories::UserRepository,
    validation::{normalize_email, validate_email},
};
use std::sync::Arc;

/// Service for user lookup and profile changes
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.repository.find_by_id(user_id).await
    }

    /// Get a user by email, matching case-insensitively
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.repository.find_by_email(&normalize_email(email)).await
    }

    /// Change a user's email address
    ///
    /// Fails with [`AuthError::EmailTaken`] if another account already uses the
    /// address and [`AuthError::UserDoesNotExist`] if the user is gone.
    pub async fn update_email(&self, user_id: &UserId, email: &str) -> Result<User, Error> {
        let email = normalize_email(email);
        validate_email(&email)?;

        self.repository
            .update_email(user_id, &email)
            .await?
            .ok_or(Error::Auth(AuthError::UserDoesNotExist))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock::MockRepository;

    #[tokio::test]
    async fn test_get_user_by_email_is_case_insensitive() {
        let repo = Arc::new(MockRepository::default());
        let user = repo.insert_user(1, "alice@example.com").await;
        let service = UserService::new(repo);

        let found = service
            .get_user_by_email("  ALICE@example.com")
            .await
            .unwrap();
        assert_eq!(found, Some(user));

        let missing = service.get_user_by_email("bob@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_update_email() {
        let repo = Arc::new(MockRepository::default());
        let user = repo.insert_user(1, "alice@example.com").await;
        let service = UserService::new(repo);

        let updated = service
            .update_email(&user.id, "Alice.New@Example.com")
            .await
            .unwrap();
        assert_eq!(updated.email, "alice.new@example.com");

        let fetched = service.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "alice.new@example.com");
    }

    #[tokio::test]
    async fn test_update_email_rejects_taken_address() {
        let repo = Arc::new(MockRepository::default());
        let alice = repo.insert_user(1, "alice@example.com").await;
        repo.insert_user(2, "bob@example.com").await;
        let service = UserService::new(repo);

        let result = service.update_email(&alice.id, "BOB@example.com").await;
        assert!(matches!(result, Err(Error::Auth(AuthError::EmailTaken))));
    }

    #[tokio::test]
    async fn test_update_email_for_missing_user() {
        let service = UserService::new(Arc::new(MockRepository::default()));

        let result = service
            .update_email(&UserId::new(99), "ghost@example.com")
            .await;
        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::UserDoesNotExist))
        ));
    }

    #[tokio::test]
    async fn test_update_email_validates_format() {
        let repo = Arc::new(MockRepository::default());
        let user = repo.insert_user(1, "alice@example.com").await;
        let service = UserService::new(repo);

        let result = service.update_email(&user.id, "not-an-email").await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
