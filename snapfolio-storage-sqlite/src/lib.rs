//! SQLite storage backend for snapfolio
//!
//! [`SqliteRepositoryProvider`] implements every repository trait from
//! `snapfolio-core` on top of a single [`sqlx::SqlitePool`]. Timestamps are
//! stored as unix seconds.
//!
//! ```rust,no_run
//! use snapfolio_core::RepositoryProvider;
//! use snapfolio_storage_sqlite::SqliteRepositoryProvider;
//!
//! # async fn example() -> Result<(), snapfolio_core::Error> {
//! let repositories = SqliteRepositoryProvider::connect("sqlite://snapfolio.db").await?;
//! repositories.migrate().await?;
//! # Ok(())
//! # }
//! ```
pub mod migrations;
pub mod repositories;

pub use repositories::{
    SqliteGalleryRepository, SqlitePasswordRepository, SqlitePasswordResetRepository,
    SqliteRepositoryProvider, SqliteSessionRepository, SqliteUserRepository,
};
