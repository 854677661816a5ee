use crate::{
    Error, Gallery, UserId,
    error::StorageError,
    repositories::GalleryRepository,
    validation::{validate_id, validate_title},
};
use std::sync::Arc;

/// Service for gallery records
///
/// Ids and titles are validated before storage is touched. Operations on a
/// gallery that does not exist fail with [`StorageError::NotFound`].
pub struct GalleryService<R: GalleryRepository> {
    repository: Arc<R>,
}

impl<R: GalleryRepository> GalleryService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, user_id: &UserId, title: &str) -> Result<Gallery, Error> {
        validate_id(user_id.as_i64())?;
        validate_title(title)?;

        self.repository.create(user_id, title).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Gallery, Error> {
        validate_id(id)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(Error::Storage(StorageError::NotFound))
    }

    /// All galleries owned by a user; empty if they have none
    pub async fn get_by_user_id(&self, user_id: &UserId) -> Result<Vec<Gallery>, Error> {
        validate_id(user_id.as_i64())?;

        self.repository.find_by_user_id(user_id).await
    }

    /// Persist a new title for an existing gallery
    pub async fn update(&self, gallery: &Gallery) -> Result<(), Error> {
        validate_id(gallery.id)?;
        validate_title(&gallery.title)?;

        if !self.repository.update(gallery).await? {
            return Err(Error::Storage(StorageError::NotFound));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        validate_id(id)?;

        if !self.repository.delete(id).await? {
            return Err(Error::Storage(StorageError::NotFound));
        }
        Ok(())
    }
}
