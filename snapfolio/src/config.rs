use chrono::Duration;
use snapfolio_core::{
    Error, MIN_BYTES_PER_TOKEN,
    error::ValidationError,
    password_reset::{default_reset_duration, max_reset_duration},
};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://snapfolio.db";

/// Runtime settings for [`crate::Snapfolio`] and the command line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapfolioConfig {
    pub database_url: String,
    /// Random bytes behind each session and reset token, at least 32.
    pub bytes_per_token: usize,
    /// How long a password reset token stays valid.
    pub reset_duration: Duration,
}

impl Default for SnapfolioConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bytes_per_token: MIN_BYTES_PER_TOKEN,
            reset_duration: default_reset_duration(),
        }
    }
}

impl SnapfolioConfig {
    /// Read `DATABASE_URL`, `SNAPFOLIO_TOKEN_BYTES` and `SNAPFOLIO_RESET_TTL_MINUTES`,
    /// falling back to the defaults for unset variables.
    ///
    /// The reset lifetime must be positive and at most 30 days.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();

        let bytes_per_token = match lookup("SNAPFOLIO_TOKEN_BYTES") {
            Some(value) => value.trim().parse::<usize>().map_err(|_| {
                ValidationError::InvalidField(format!("SNAPFOLIO_TOKEN_BYTES: {value}"))
            })?,
            None => defaults.bytes_per_token,
        };

        let reset_duration = match lookup("SNAPFOLIO_RESET_TTL_MINUTES") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .and_then(Duration::try_minutes)
                .filter(|duration| *duration <= max_reset_duration())
                .ok_or_else(|| {
                    ValidationError::InvalidField(format!("SNAPFOLIO_RESET_TTL_MINUTES: {value}"))
                })?,
            None => defaults.reset_duration,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bytes_per_token,
            reset_duration,
        })
    }
}
