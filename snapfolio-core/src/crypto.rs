//! Token generation and hashing
//!
//! Session cookies and password reset links carry a raw token. Only the SHA-256
//! hash of that token is ever written to storage, so a leaked database row cannot
//! be replayed.
//!
//! ## Why SHA-256 and no salt?
//!
//! Tokens carry at least 256 bits of CSPRNG output and are single-use or
//! short-lived. Brute-forcing a preimage is infeasible, so the slow, salted
//! hashing that low-entropy passwords need buys nothing here.

use std::fmt;

use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{Error, error::CryptoError};

/// The minimum number of random bytes behind every token.
pub const MIN_BYTES_PER_TOKEN: usize = 32;

/// A raw, high-entropy secret shown to the user exactly once.
///
/// `Debug` is redacted and there is no `Display` impl, so a raw token cannot end
/// up in a log line through `{}` or `{:?}`.
#[derive(Clone, PartialEq, Eq)]
pub struct RawToken(String);

impl RawToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// The one-way hash stored in place of this token.
    pub fn hash(&self) -> String {
        hash_token(&self.0)
    }
}

impl fmt::Debug for RawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawToken(<redacted>)")
    }
}

impl From<String> for RawToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for RawToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Mints random tokens and derives their storage hashes.
///
/// The byte count is floored at [`MIN_BYTES_PER_TOKEN`]; asking for fewer bytes
/// silently uses the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenManager {
    bytes_per_token: usize,
}

impl TokenManager {
    pub fn new(bytes_per_token: usize) -> Self {
        Self {
            bytes_per_token: bytes_per_token.max(MIN_BYTES_PER_TOKEN),
        }
    }

    pub fn bytes_per_token(&self) -> usize {
        self.bytes_per_token
    }

    /// Generate a new raw token together with its hash.
    ///
    /// Fails only if the operating system's entropy source is unavailable.
    pub fn generate(&self) -> Result<(RawToken, String), Error> {
        let mut bytes = vec![0u8; self.bytes_per_token];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!(error = %e, "OS RNG failure");
            CryptoError::Entropy(e.to_string())
        })?;

        let token = RawToken(BASE64_URL_SAFE_NO_PAD.encode(bytes));
        let token_hash = token.hash();
        Ok((token, token_hash))
    }

    pub fn hash(&self, token: &str) -> String {
        hash_token(token)
    }
}

impl Default for TokenManager {
    fn default() -> Self {
        Self::new(MIN_BYTES_PER_TOKEN)
    }
}

/// SHA-256 of the token bytes, URL-safe base64 without padding (43 characters).
pub fn hash_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    BASE64_URL_SAFE_NO_PAD.encode(digest)
}

/// Hash `token` and compare it against `stored_hash` in constant time.
pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
    constant_time_compare(hash_token(token).as_bytes(), stored_hash.as_bytes())
}

pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
