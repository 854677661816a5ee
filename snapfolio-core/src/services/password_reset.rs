use crate::{
    Error, PasswordReset, TokenManager, User,
    crypto::constant_time_compare,
    error::{AuthError, TokenError, ValidationError},
    password_reset::{default_reset_duration, reset_expires_at},
    repositories::{PasswordResetRepository, UserRepository},
    services::UserService,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Service for password reset operations
///
/// A user has at most one outstanding reset. Requesting another replaces the
/// token and pushes the expiry out. A token is consumed at most once.
pub struct PasswordResetService<U: UserRepository, R: PasswordResetRepository> {
    user_service: UserService<U>,
    reset_repository: Arc<R>,
    token_manager: TokenManager,
    duration: Duration,
}

impl<U: UserRepository, R: PasswordResetRepository> PasswordResetService<U, R> {
    /// Create a new PasswordResetService with the default one hour token lifetime
    pub fn new(
        user_repository: Arc<U>,
        reset_repository: Arc<R>,
        token_manager: TokenManager,
    ) -> Self {
        Self {
            user_service: UserService::new(user_repository),
            reset_repository,
            token_manager,
            duration: default_reset_duration(),
        }
    }

    /// Set the token lifetime; zero or negative falls back to the default
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = if duration > Duration::zero() {
            duration
        } else {
            default_reset_duration()
        };
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Issue a reset token for the account with the given email
    pub async fn create(&self, email: &str) -> Result<PasswordReset, Error> {
        self.create_at(email, Utc::now()).await
    }

    /// Issue a reset token as if the current time were `now`
    ///
    /// Fails with [`AuthError::UserDoesNotExist`] and writes nothing if no
    /// account uses the email. The expiry is `now` plus the lifetime, rounded
    /// up to a whole second.
    pub async fn create_at(&self, email: &str, now: DateTime<Utc>) -> Result<PasswordReset, Error> {
        let Some(user) = self.user_service.get_user_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Err(Error::Auth(AuthError::UserDoesNotExist));
        };

        let expires_at = reset_expires_at(now, self.duration).ok_or_else(|| {
            ValidationError::InvalidField(format!(
                "reset duration out of range: {}",
                self.duration
            ))
        })?;

        let (token, token_hash) = self.token_manager.generate()?;
        let stored = self
            .reset_repository
            .upsert(&user.id, &token_hash, expires_at)
            .await?;

        tracing::debug!(user_id = %user.id, expires_at = %stored.expires_at, "Password reset created");
        Ok(PasswordReset::from_stored(stored, token))
    }

    /// Redeem a reset token and return the user it was issued for
    pub async fn consume(&self, token: &str) -> Result<User, Error> {
        self.consume_at(token, Utc::now()).await
    }

    /// Redeem a reset token as if the current time were `now`
    ///
    /// An unknown token fails with [`TokenError::NotFound`]. A token past its
    /// expiry fails with [`TokenError::Expired`] and its row is left in place.
    /// Success deletes the row, so the same token cannot be redeemed twice.
    pub async fn consume_at(&self, token: &str, now: DateTime<Utc>) -> Result<User, Error> {
        let token_hash = self.token_manager.hash(token);

        let Some((reset, user)) = self
            .reset_repository
            .find_by_token_hash(&token_hash)
            .await?
        else {
            tracing::debug!("No password reset for presented token");
            return Err(Error::Token(TokenError::NotFound));
        };

        if !constant_time_compare(reset.token_hash.as_bytes(), token_hash.as_bytes()) {
            return Err(Error::Token(TokenError::NotFound));
        }

        if reset.is_expired_at(now) {
            tracing::debug!(user_id = %user.id, "Password reset token expired");
            return Err(Error::Token(TokenError::Expired));
        }

        self.reset_repository.delete(reset.id).await?;
        Ok(user)
    }

    /// Delete resets that expired before now
    pub async fn cleanup_expired(&self) -> Result<u64, Error> {
        self.cleanup_expired_at(Utc::now()).await
    }

    pub async fn cleanup_expired_at(&self, now: DateTime<Utc>) -> Result<u64, Error> {
        let removed = self.reset_repository.delete_expired(now).await?;
        if removed > 0 {
            tracing::info!(removed, "Removed expired password resets");
        }
        Ok(removed)
    }
}
