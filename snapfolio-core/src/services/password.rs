use crate::{
    Error, NewUser, User, UserId,
    error::{AuthError, CryptoError},
    repositories::{PasswordRepository, UserRepository},
    services::UserService,
    validation::{normalize_email, validate_email, validate_password},
};
use std::sync::{Arc, LazyLock};

/// Verified against when no account matches, keeping misses as slow as wrong passwords.
static DUMMY_PASSWORD_HASH: LazyLock<String> =
    LazyLock::new(|| password_auth::generate_hash("snapfolio-dummy-password"));

/// Service for password authentication operations
pub struct PasswordService<U: UserRepository, P: PasswordRepository> {
    user_repository: Arc<U>,
    user_service: UserService<U>,
    password_repository: Arc<P>,
}

impl<U: UserRepository, P: PasswordRepository> PasswordService<U, P> {
    /// Create a new PasswordService with the given repositories
    pub fn new(user_repository: Arc<U>, password_repository: Arc<P>) -> Self {
        let user_service = UserService::new(user_repository.clone());
        Self {
            user_repository,
            user_service,
            password_repository,
        }
    }

    /// Create a user account with a password
    ///
    /// The email is stored lowercased; an address already in use fails with
    /// [`AuthError::EmailTaken`].
    pub async fn create_user(&self, email: &str, password: &str) -> Result<User, Error> {
        // Validate password strength before any other operations
        validate_password(password)?;

        let email = normalize_email(email);
        validate_email(&email)?;

        let password_hash = Self::hash_password(password);
        self.user_repository
            .create(NewUser::new(email, password_hash))
            .await
    }

    /// Authenticate a user with email and password
    ///
    /// An unknown email and a wrong password both fail with
    /// [`AuthError::InvalidCredentials`].
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, Error> {
        let Some(user) = self.user_service.get_user_by_email(email).await? else {
            Self::verify_dummy_password(password);
            return Err(Error::Auth(AuthError::InvalidCredentials));
        };

        let Some(password_hash) = self.password_repository.get_password_hash(&user.id).await?
        else {
            Self::verify_dummy_password(password);
            return Err(Error::Auth(AuthError::InvalidCredentials));
        };

        if !Self::verify_password(password, &password_hash)? {
            return Err(Error::Auth(AuthError::InvalidCredentials));
        }

        Ok(user)
    }

    /// Replace a user's password without asking for the old one
    pub async fn update_password(&self, user_id: &UserId, password: &str) -> Result<(), Error> {
        validate_password(password)?;

        if self.user_service.get_user(user_id).await?.is_none() {
            return Err(Error::Auth(AuthError::UserDoesNotExist));
        }

        let password_hash = Self::hash_password(password);
        self.password_repository
            .set_password_hash(user_id, &password_hash)
            .await
    }

    /// Hash a password using argon2
    fn hash_password(password: &str) -> String {
        password_auth::generate_hash(password)
    }

    fn verify_dummy_password(password: &str) {
        let _ = password_auth::verify_password(password, &DUMMY_PASSWORD_HASH);
    }

    /// Verify a password against a hash
    ///
    /// A stored hash that cannot be parsed is an error, not a failed login.
    fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
        use password_auth::VerifyError;

        match password_auth::verify_password(password, hash) {
            Ok(()) => Ok(true),
            Err(VerifyError::PasswordInvalid) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, "Stored password hash is unreadable");
                Err(Error::Crypto(CryptoError::PasswordHash(e.to_string())))
            }
        }
    }
}
