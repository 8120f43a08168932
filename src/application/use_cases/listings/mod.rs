pub mod create_listing;
pub mod delete_listing;
pub mod get_listing;
pub mod get_own_listing;
pub mod list_latest;
pub mod list_rubric_listings;
pub mod update_listing;

use crate::application::forms::listing::UploadedFile;
use crate::application::ports::image_storage::ImageStorage;

/// Stores every file, rolling back the ones already written if any write fails.
pub(crate) async fn store_files<S: ImageStorage + ?Sized>(
    storage: &S,
    files: &[UploadedFile],
) -> anyhow::Result<Vec<String>> {
    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        match storage.store_image(file.filename.as_deref(), &file.bytes).await {
            Ok(img) => stored.push(img.relative_path),
            Err(err) => {
                discard_files(storage, &stored).await;
                return Err(err);
            }
        }
    }
    Ok(stored)
}

pub(crate) async fn discard_files<S: ImageStorage + ?Sized>(storage: &S, paths: &[String]) {
    for path in paths {
        if let Err(err) = storage.delete_image(path).await {
            tracing::warn!(path = %path, error = ?err, "failed to remove stored image");
        }
    }
}
