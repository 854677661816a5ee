use crate::{
    Error, Gallery, NewUser, StoredPasswordReset, StoredSession, User, UserId,
    repositories::{
        GalleryRepository, PasswordRepository, PasswordResetRepository, RepositoryProvider,
        SessionRepository, UserRepository,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Adapter that wraps a RepositoryProvider and implements individual repository traits
pub struct UserRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> UserRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> UserRepository for UserRepositoryAdapter<R> {
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.provider.user().create(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.provider.user().find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        self.provider.user().find_by_email(email).await
    }

    async fn update_email(&self, id: &UserId, email: &str) -> Result<Option<User>, Error> {
        self.provider.user().update_email(id, email).await
    }
}

pub struct SessionRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> SessionRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> SessionRepository for SessionRepositoryAdapter<R> {
    async fn upsert(&self, user_id: &UserId, token_hash: &str) -> Result<StoredSession, Error> {
        self.provider.session().upsert(user_id, token_hash).await
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredSession, User)>, Error> {
        self.provider.session().find_by_token_hash(token_hash).await
    }

    async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), Error> {
        self.provider.session().delete_by_token_hash(token_hash).await
    }
}

pub struct PasswordRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> PasswordRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> PasswordRepository for PasswordRepositoryAdapter<R> {
    async fn set_password_hash(&self, user_id: &UserId, hash: &str) -> Result<(), Error> {
        self.provider
            .password()
            .set_password_hash(user_id, hash)
            .await
    }

    async fn get_password_hash(&self, user_id: &UserId) -> Result<Option<String>, Error> {
        self.provider.password().get_password_hash(user_id).await
    }
}

pub struct PasswordResetRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> PasswordResetRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> PasswordResetRepository for PasswordResetRepositoryAdapter<R> {
    async fn upsert(
        &self,
        user_id: &UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<StoredPasswordReset, Error> {
        self.provider
            .password_reset()
            .upsert(user_id, token_hash, expires_at)
            .await
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<(StoredPasswordReset, User)>, Error> {
        self.provider
            .password_reset()
            .find_by_token_hash(token_hash)
            .await
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.provider.password_reset().delete(id).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        self.provider.password_reset().delete_expired(now).await
    }
}

pub struct GalleryRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> GalleryRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> GalleryRepository for GalleryRepositoryAdapter<R> {
    async fn create(&self, user_id: &UserId, title: &str) -> Result<Gallery, Error> {
        self.provider.gallery().create(user_id, title).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>, Error> {
        self.provider.gallery().find_by_id(id).await
    }

    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Gallery>, Error> {
        self.provider.gallery().find_by_user_id(user_id).await
    }

    async fn update(&self, gallery: &Gallery) -> Result<bool, Error> {
        self.provider.gallery().update(gallery).await
    }

    async fn delete(&self, id: i64) -> Result<bool, Error> {
        self.provider.gallery().delete(id).await
    }
}
