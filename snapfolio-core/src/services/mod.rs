//! Service layer for business logic
//!
//! Services are generic over the repository traits they need and hold them in
//! `Arc`s, so any storage backend can be plugged in without the services knowing.

pub mod gallery;
pub mod password;
pub mod password_reset;
pub mod session;
pub mod user;

#[cfg(test)]
mod mock;

pub use gallery::GalleryService;
pub use password::PasswordService;
pub use password_reset::PasswordResetService;
pub use session::SessionService;
pub use user::UserService;
