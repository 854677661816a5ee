use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Lazy-loaded email validation regex
///
/// A practical subset of RFC 5322, compiled once and reused.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

/// Lowercase and trim an email address before it is stored or looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an email address
///
/// # Examples
///
/// ```rust
/// use snapfolio_core::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("invalid-email").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField(
            "Email is required".to_string(),
        ));
    }

    if email.len() > 254 {
        return Err(ValidationError::InvalidEmail(
            "Email is too long".to_string(),
        ));
    }

    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Validates a password
///
/// Passwords must be 8 to 128 bytes long and not only whitespace.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    if password.trim().is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password cannot be only whitespace".to_string(),
        ));
    }

    if password.len() < 8 {
        return Err(ValidationError::InvalidPassword(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(ValidationError::InvalidPassword(
            "Password must be no more than 128 characters long".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingField(
            "Title is required".to_string(),
        ));
    }

    if title.len() > 255 {
        return Err(ValidationError::InvalidField(
            "Title must be no more than 255 characters long".to_string(),
        ));
    }

    Ok(())
}

/// Row ids are assigned by storage and start at 1.
pub fn validate_id(id: i64) -> Result<(), ValidationError> {
    if id < 0 {
        return Err(ValidationError::InvalidId(id));
    }

    Ok(())
}
