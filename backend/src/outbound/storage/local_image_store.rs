//! Local-disk `ImageStore` scoped to one directory with `cap_std`.
//!
//! Files are named `<uuid>.<ext>` and addressed by clients as
//! `uploads/images/<uuid>.<ext>`. The store never touches paths outside its
//! directory: anything that is not a bare file name under the public prefix
//! is rejected as foreign.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImagePath, ImageUpload};

/// Prefix of every stored image path, matching the static file route.
pub const PUBLIC_IMAGE_PREFIX: &str = "uploads/images";

/// Image store writing into a single capability-scoped directory.
#[derive(Clone)]
pub struct LocalImageStore {
    dir: Arc<Dir>,
}

impl LocalImageStore {
    /// Open `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the directory cannot be created or opened.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

fn io_error(error: &io::Error) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

fn join_error(error: tokio::task::JoinError) -> ImageStoreError {
    ImageStoreError::io(format!("image task failed: {error}"))
}

/// File name inside the store for a public path, if it belongs here.
fn file_name_for(path: &ImagePath) -> Option<&str> {
    let name = path
        .as_ref()
        .strip_prefix(PUBLIC_IMAGE_PREFIX)?
        .strip_prefix('/')?;
    let is_bare = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";
    is_bare.then_some(name)
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: &ImageUpload) -> Result<ImagePath, ImageStoreError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), upload.kind().extension());
        let public = format!("{PUBLIC_IMAGE_PREFIX}/{file_name}");
        let dir = Arc::clone(&self.dir);
        let bytes = upload.bytes().to_vec();

        tokio::task::spawn_blocking(move || dir.write(&file_name, bytes))
            .await
            .map_err(join_error)?
            .map_err(|error| io_error(&error))?;

        debug!(path = %public, "stored image");
        ImagePath::new(public).map_err(|error| ImageStoreError::io(error.to_string()))
    }

    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        let file_name = file_name_for(path)
            .ok_or_else(|| ImageStoreError::foreign_path(path.as_ref()))?
            .to_owned();
        let dir = Arc::clone(&self.dir);

        let outcome = tokio::task::spawn_blocking(move || dir.remove_file(&file_name))
            .await
            .map_err(join_error)?;
        match outcome {
            Ok(()) => {
                debug!(%path, "removed image");
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(io_error(&error)),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the disk-backed store using temporary directories.
    use super::*;
    use crate::domain::ImageKind;
    use rstest::rstest;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalImageStore) {
        let temp = TempDir::new().expect("temp dir");
        let store = LocalImageStore::open(&temp.path().join("images")).expect("open store");
        (temp, store)
    }

    fn images_dir(temp: &TempDir) -> Dir {
        Dir::open_ambient_dir(temp.path().join("images"), ambient_authority()).expect("images dir")
    }

    fn png() -> ImageUpload {
        ImageUpload::new(ImageKind::Png, vec![0x89, b'P', b'N', b'G']).expect("upload")
    }

    #[tokio::test]
    async fn store_writes_under_a_generated_name() {
        let (temp, store) = store();

        let path = store.store(&png()).await.expect("stored");

        let name = file_name_for(&path).expect("own path");
        assert!(name.ends_with(".png"));
        let on_disk = images_dir(&temp).read(name).expect("file");
        assert_eq!(on_disk, vec![0x89, b'P', b'N', b'G']);
    }

    #[tokio::test]
    async fn jpeg_uploads_use_the_jpeg_extension() {
        let (_temp, store) = store();
        let upload = ImageUpload::new(ImageKind::Jpeg, vec![0xff, 0xd8]).expect("upload");

        let path = store.store(&upload).await.expect("stored");

        assert!(path.as_ref().starts_with("uploads/images/"));
        assert!(path.as_ref().ends_with(".jpeg"));
    }

    #[tokio::test]
    async fn remove_deletes_the_file_and_tolerates_repeats() {
        let (temp, store) = store();
        let path = store.store(&png()).await.expect("stored");
        let name = file_name_for(&path).expect("own path").to_owned();

        store.remove(&path).await.expect("removed");
        assert!(!images_dir(&temp).exists(&name));
        store.remove(&path).await.expect("missing file is fine");
    }

    #[rstest]
    #[case::other_prefix("static/x.png")]
    #[case::traversal("uploads/images/../secret")]
    #[case::nested("uploads/images/a/b.png")]
    #[case::bare_prefix("uploads/images/")]
    #[tokio::test]
    async fn remove_refuses_foreign_paths(#[case] raw: &str) {
        let (_temp, store) = store();
        let path = ImagePath::new(raw).expect("non-empty");

        let error = store.remove(&path).await.expect_err("foreign");

        assert_eq!(error, ImageStoreError::foreign_path(raw));
    }
}
