use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with provided email address does not exist")]
    UserDoesNotExist,

    #[error("Email address is already in use")]
    EmailTaken,
}

/// Failures of session and password reset token lookups.
///
/// `NotFound` never says whether a token existed at some point, so callers
/// must treat it exactly like "not authenticated".
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token not found")]
    NotFound,

    #[error("Token expired")]
    Expired,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record not found")]
    NotFound,
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Id must be a positive number: {0}")]
    InvalidId(i64),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl Error {
    /// True for token lookups that missed and for gallery rows that do not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Token(TokenError::NotFound) | Error::Storage(StorageError::NotFound)
        )
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Error::Token(TokenError::Expired))
    }

    /// Errors a caller should answer with "please sign in" and nothing more specific.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Error::Token(TokenError::NotFound) | Error::Auth(AuthError::InvalidCredentials)
        )
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
