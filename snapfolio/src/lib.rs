//! # Snapfolio
//!
//! Accounts, sessions, password resets and gallery records for the snapfolio photo
//! sharing application.
//!
//! [`Snapfolio`] wires the services from `snapfolio-core` to a storage backend and
//! exposes the account flows a web layer needs: sign up, sign in, sign out,
//! forgot and reset password, and change email. Every flow that authenticates a
//! user hands back a fresh [`Session`] whose raw token belongs in a cookie.
//!
//! ## Example
//!
//! ```rust,no_run
//! use snapfolio::{Snapfolio, SnapfolioConfig, SqliteRepositoryProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), snapfolio::Error> {
//!     let repositories = Arc::new(SqliteRepositoryProvider::connect("sqlite::memory:").await?);
//!     let snapfolio = Snapfolio::new(repositories).with_config(&SnapfolioConfig::default());
//!     snapfolio.migrate().await?;
//!
//!     let (user, session) = snapfolio.sign_up("alice@example.com", "password123").await?;
//!     let current = snapfolio.current_user(session.token.as_str()).await?;
//!     assert_eq!(current.id, user.id);
//!     Ok(())
//! }
//! ```
use std::sync::Arc;

use chrono::{DateTime, Utc};
use snapfolio_core::{
    RepositoryProvider, TokenManager,
    repositories::{
        GalleryRepositoryAdapter, PasswordRepositoryAdapter, PasswordResetRepositoryAdapter,
        SessionRepositoryAdapter, UserRepositoryAdapter,
    },
    services::{
        GalleryService, PasswordResetService, PasswordService, SessionService, UserService,
    },
    validation::validate_password,
};

mod config;

pub use config::{DEFAULT_DATABASE_URL, SnapfolioConfig};

/// Re-export core types from snapfolio_core
pub use snapfolio_core::{
    Error, Gallery, PasswordReset, RawToken, Session, User, UserId,
    error::{AuthError, CryptoError, StorageError, TokenError, ValidationError},
};

#[cfg(feature = "sqlite")]
pub use snapfolio_storage_sqlite::SqliteRepositoryProvider;

type Users<R> = UserRepositoryAdapter<R>;
type Passwords<R> = PasswordRepositoryAdapter<R>;
type Sessions<R> = SessionRepositoryAdapter<R>;
type Resets<R> = PasswordResetRepositoryAdapter<R>;
type Galleries<R> = GalleryRepositoryAdapter<R>;

/// The main entry point for snapfolio account and gallery operations.
///
/// Errors from the underlying services are returned unchanged, so callers can
/// match on [`Error`] or use helpers such as [`Error::is_unauthenticated`].
pub struct Snapfolio<R: RepositoryProvider> {
    repositories: Arc<R>,
    user_service: Arc<UserService<Users<R>>>,
    password_service: Arc<PasswordService<Users<R>, Passwords<R>>>,
    session_service: Arc<SessionService<Sessions<R>>>,
    password_reset_service: Arc<PasswordResetService<Users<R>, Resets<R>>>,
    gallery_service: Arc<GalleryService<Galleries<R>>>,
}

impl<R: RepositoryProvider> Snapfolio<R> {
    /// Create a new instance with default settings
    pub fn new(repositories: Arc<R>) -> Self {
        let user_repo = Arc::new(UserRepositoryAdapter::new(repositories.clone()));
        let token_manager = TokenManager::default();

        Self {
            repositories: repositories.clone(),
            user_service: Arc::new(UserService::new(user_repo.clone())),
            password_service: Arc::new(PasswordService::new(
                user_repo.clone(),
                Arc::new(PasswordRepositoryAdapter::new(repositories.clone())),
            )),
            session_service: Arc::new(SessionService::new(
                Arc::new(SessionRepositoryAdapter::new(repositories.clone())),
                token_manager,
            )),
            password_reset_service: Arc::new(PasswordResetService::new(
                user_repo,
                Arc::new(PasswordResetRepositoryAdapter::new(repositories.clone())),
                token_manager,
            )),
            gallery_service: Arc::new(GalleryService::new(Arc::new(
                GalleryRepositoryAdapter::new(repositories),
            ))),
        }
    }

    /// Apply token size and reset lifetime from `config`
    ///
    /// The database URL is not used here; it is consumed when the repository
    /// provider is built.
    pub fn with_config(mut self, config: &SnapfolioConfig) -> Self {
        let user_repo = Arc::new(UserRepositoryAdapter::new(self.repositories.clone()));
        let token_manager = TokenManager::new(config.bytes_per_token);

        self.session_service = Arc::new(SessionService::new(
            Arc::new(SessionRepositoryAdapter::new(self.repositories.clone())),
            token_manager,
        ));
        self.password_reset_service = Arc::new(
            PasswordResetService::new(
                user_repo,
                Arc::new(PasswordResetRepositoryAdapter::new(
                    self.repositories.clone(),
                )),
                token_manager,
            )
            .with_duration(config.reset_duration),
        );
        self
    }

    /// Run migrations for all repositories
    pub async fn migrate(&self) -> Result<(), Error> {
        self.repositories.migrate().await
    }

    /// Health check for all repositories
    pub async fn health_check(&self) -> Result<(), Error> {
        self.repositories.health_check().await
    }

    pub fn users(&self) -> &UserService<Users<R>> {
        &self.user_service
    }

    pub fn sessions(&self) -> &SessionService<Sessions<R>> {
        &self.session_service
    }

    pub fn password_resets(&self) -> &PasswordResetService<Users<R>, Resets<R>> {
        &self.password_reset_service
    }

    pub fn galleries(&self) -> &GalleryService<Galleries<R>> {
        &self.gallery_service
    }

    pub async fn get_user(&self, user_id: &UserId) -> Result<Option<User>, Error> {
        self.user_service.get_user(user_id).await
    }
}

impl<R: RepositoryProvider> Snapfolio<R> {
    /// Create an account and sign it in
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<(User, Session), Error> {
        let user = self.password_service.create_user(email, password).await?;
        let session = self.session_service.create(&user.id).await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok((user, session))
    }

    /// Check credentials and start a new session, replacing any previous one
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(User, Session), Error> {
        let user = self.password_service.authenticate(email, password).await?;
        let session = self.session_service.create(&user.id).await?;

        Ok((user, session))
    }

    /// End the session holding `token`; unknown tokens are ignored
    pub async fn sign_out(&self, token: &str) -> Result<(), Error> {
        self.session_service.delete(token).await
    }

    /// The user signed in with `token`
    ///
    /// Fails with [`TokenError::NotFound`] when the token matches no session.
    pub async fn current_user(&self, token: &str) -> Result<User, Error> {
        self.session_service.user(token).await
    }

    /// Issue a password reset token for `email`
    ///
    /// Delivering the token to the user is up to the caller.
    pub async fn forgot_password(&self, email: &str) -> Result<PasswordReset, Error> {
        self.password_reset_service.create(email).await
    }

    pub async fn forgot_password_at(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<PasswordReset, Error> {
        self.password_reset_service.create_at(email, now).await
    }

    /// Redeem a reset token, set a new password and sign the user in
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(User, Session), Error> {
        self.reset_password_at(token, new_password, Utc::now())
            .await
    }

    /// As [`Self::reset_password`], as if the current time were `now`
    ///
    /// The new password is validated before the token is consumed, so a
    /// rejected password leaves the token usable.
    pub async fn reset_password_at(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(User, Session), Error> {
        validate_password(new_password)?;

        let user = self.password_reset_service.consume_at(token, now).await?;
        self.password_service
            .update_password(&user.id, new_password)
            .await?;
        let session = self.session_service.create(&user.id).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok((user, session))
    }

    /// Change the signed-in user's email and issue a fresh session
    pub async fn change_email(
        &self,
        user_id: &UserId,
        email: &str,
    ) -> Result<(User, Session), Error> {
        let user = self.user_service.update_email(user_id, email).await?;
        let session = self.session_service.create(&user.id).await?;

        Ok((user, session))
    }

    /// Delete password resets that expired before now
    pub async fn cleanup_expired_password_resets(&self) -> Result<u64, Error> {
        self.password_reset_service.cleanup_expired().await
    }
}

#[cfg(feature = "sqlite")]
impl Snapfolio<SqliteRepositoryProvider> {
    /// Connect to the SQLite database named in `config` and apply its settings
    pub async fn connect(config: &SnapfolioConfig) -> Result<Self, Error> {
        let repositories = SqliteRepositoryProvider::connect(&config.database_url).await?;
        Ok(Self::new(Arc::new(repositories)).with_config(config))
    }
}
