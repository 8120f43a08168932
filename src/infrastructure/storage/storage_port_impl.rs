use std::path::PathBuf;

use crate::application::ports::image_storage::{ImageStorage, StoredImage};

/// Keeps uploaded images under `<uploads_root>/images/`.
pub struct FsImageStorage {
    pub uploads_root: PathBuf,
}

impl FsImageStorage {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }
}

#[async_trait::async_trait]
impl ImageStorage for FsImageStorage {
    async fn store_image(
        &self,
        original_filename: Option<&str>,
        bytes: &[u8],
    ) -> anyhow::Result<StoredImage> {
        let dir = self.uploads_root.join("images");
        tokio::fs::create_dir_all(&dir).await?;
        let name = crate::infrastructure::storage::generate_file_name(
            original_filename,
            chrono::Utc::now(),
        );
        let full = dir.join(&name);
        tokio::fs::write(&full, bytes).await?;
        let relative_path =
            crate::infrastructure::storage::relative_from_uploads(&self.uploads_root, &full);
        tracing::debug!(path = %relative_path, size = bytes.len(), "image_stored");
        Ok(StoredImage { relative_path })
    }

    async fn delete_image(&self, relative_path: &str) -> anyhow::Result<()> {
        let full = crate::infrastructure::storage::resolve_under(&self.uploads_root, relative_path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn stores_and_deletes_images() {
        let temp = TempDir::new().unwrap();
        let storage = FsImageStorage::new(temp.path());

        let stored = storage.store_image(Some("photo.png"), b"png-bytes").await.unwrap();
        assert!(stored.relative_path.starts_with("images/"));
        assert!(stored.relative_path.ends_with(".png"));
        let full = temp.path().join(&stored.relative_path);
        assert_eq!(std::fs::read(&full).unwrap(), b"png-bytes");

        storage.delete_image(&stored.relative_path).await.unwrap();
        assert!(!full.exists());
        // second delete is a no-op
        storage.delete_image(&stored.relative_path).await.unwrap();
    }

    #[tokio::test]
    async fn delete_refuses_paths_outside_root() {
        let temp = TempDir::new().unwrap();
        let storage = FsImageStorage::new(temp.path().join("uploads"));
        assert!(storage.delete_image("../outside.png").await.is_err());
    }
}
