//! Port for storing uploaded images.

use async_trait::async_trait;

use crate::domain::{ImagePath, ImageUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Reading or writing the backing storage failed.
        Io { message: String } => "image store io failed: {message}",
        /// The path does not belong to this store.
        ForeignPath { path: String } => "image path outside store: {path}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an upload under a freshly generated name.
    async fn store(&self, upload: &ImageUpload) -> Result<ImagePath, ImageStoreError>;

    /// Delete a stored image. Removing a missing file is not an error.
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError>;
}
