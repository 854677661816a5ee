use crate::{Error, Gallery, UserId};
use async_trait::async_trait;

/// Repository for gallery data access
#[async_trait]
pub trait GalleryRepository: Send + Sync + 'static {
    async fn create(&self, user_id: &UserId, title: &str) -> Result<Gallery, Error>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Gallery>, Error>;

    /// All galleries owned by a user, oldest first
    async fn find_by_user_id(&self, user_id: &UserId) -> Result<Vec<Gallery>, Error>;

    /// Update a gallery's title; `false` if no row matched
    async fn update(&self, gallery: &Gallery) -> Result<bool, Error>;

    /// Delete a gallery; `false` if no row matched
    async fn delete(&self, id: i64) -> Result<bool, Error>;
}
