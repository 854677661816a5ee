//! Core functionality for snapfolio
//!
//! This crate contains the domain types shared by every snapfolio crate: users,
//! sessions, password resets and galleries, the error kinds they fail with, the
//! token manager used to mint and hash secrets, the repository traits storage
//! backends implement, and the services that hold the business rules.
//!
//! Storage backends depend on this crate and implement [`RepositoryProvider`].
//! Application code normally goes through the `snapfolio` facade instead of
//! wiring services by hand.
//!
//! See [`TokenManager`] for token generation, [`services::SessionService`] and
//! [`services::PasswordResetService`] for the credential lifecycle.
pub mod crypto;
pub mod error;
pub mod gallery;
pub mod password_reset;
pub mod repositories;
pub mod services;
pub mod session;
pub mod user;
pub mod validation;

pub use crypto::{MIN_BYTES_PER_TOKEN, RawToken, TokenManager};
pub use error::Error;
pub use gallery::Gallery;
pub use password_reset::{PasswordReset, StoredPasswordReset};
pub use repositories::RepositoryProvider;
pub use session::{Session, StoredSession};
pub use user::{NewUser, User, UserId};
