//! Repository traits for data access layer
//!
//! This module defines the repository interfaces that services use to interact with storage.
//!
//! # Trait Hierarchy
//!
//! - Individual `*Repository` traits define the operations for each data domain
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits plus lifecycle methods
//!
//! Services are generic over the individual `*Repository` traits. The adapters in
//! [`adapter`] turn a shared `RepositoryProvider` into those individual repositories.

pub mod adapter;
pub mod gallery;
pub mod password;
pub mod password_reset;
pub mod session;
pub mod user;

pub use adapter::{
    GalleryRepositoryAdapter, PasswordRepositoryAdapter, PasswordResetRepositoryAdapter,
    SessionRepositoryAdapter, UserRepositoryAdapter,
};
pub use gallery::GalleryRepository;
pub use password::PasswordRepository;
pub use password_reset::PasswordResetRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use async_trait::async_trait;

use crate::Error;

// ============================================================================
// Individual Repository Provider Traits
// ============================================================================

/// Provider trait for user repository access.
pub trait UserRepositoryProvider: Send + Sync + 'static {
    /// The user repository implementation type
    type UserRepo: UserRepository;

    /// Get the user repository
    fn user(&self) -> &Self::UserRepo;
}

/// Provider trait for session repository access.
pub trait SessionRepositoryProvider: Send + Sync + 'static {
    /// The session repository implementation type
    type SessionRepo: SessionRepository;

    /// Get the session repository
    fn session(&self) -> &Self::SessionRepo;
}

/// Provider trait for password repository access.
pub trait PasswordRepositoryProvider: Send + Sync + 'static {
    /// The password repository implementation type
    type PasswordRepo: PasswordRepository;

    /// Get the password repository
    fn password(&self) -> &Self::PasswordRepo;
}

/// Provider trait for password reset repository access.
pub trait PasswordResetRepositoryProvider: Send + Sync + 'static {
    /// The password reset repository implementation type
    type PasswordResetRepo: PasswordResetRepository;

    /// Get the password reset repository
    fn password_reset(&self) -> &Self::PasswordResetRepo;
}

/// Provider trait for gallery repository access.
pub trait GalleryRepositoryProvider: Send + Sync + 'static {
    /// The gallery repository implementation type
    type GalleryRepo: GalleryRepository;

    /// Get the gallery repository
    fn gallery(&self) -> &Self::GalleryRepo;
}

// ============================================================================
// Unified Repository Provider Trait
// ============================================================================

/// Provider trait that storage implementations must implement to provide all repositories.
///
/// # Implementing a Custom Storage Backend
///
/// 1. Implement each individual `*Repository` trait for your backend
/// 2. Implement each individual `*RepositoryProvider` trait
/// 3. Implement the `RepositoryProvider` trait with `migrate()` and `health_check()`
///
/// ```rust,ignore
/// use snapfolio_core::repositories::*;
///
/// struct MyStorage { /* ... */ }
///
/// impl UserRepositoryProvider for MyStorage {
///     type UserRepo = MyUserRepository;
///     fn user(&self) -> &Self::UserRepo { &self.user_repo }
/// }
///
/// #[async_trait]
/// impl RepositoryProvider for MyStorage {
///     async fn migrate(&self) -> Result<(), Error> { /* ... */ }
///     async fn health_check(&self) -> Result<(), Error> { /* ... */ }
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider:
    UserRepositoryProvider
    + SessionRepositoryProvider
    + PasswordRepositoryProvider
    + PasswordResetRepositoryProvider
    + GalleryRepositoryProvider
{
    /// Run migrations for all repositories
    async fn migrate(&self) -> Result<(), Error>;

    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
