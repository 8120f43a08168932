use uuid::Uuid;

use crate::application::ports::image_storage::ImageStorage;
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::user_repository::UserRepository;

pub struct DeleteAccount<'a, U, L, S>
where
    U: UserRepository + ?Sized,
    L: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub users: &'a U,
    pub listings: &'a L,
    pub images: &'a S,
}

impl<'a, U, L, S> DeleteAccount<'a, U, L, S>
where
    U: UserRepository + ?Sized,
    L: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    /// Listings and their image rows go with the user through cascading
    /// foreign keys; the stored files are removed afterwards.
    pub async fn execute(&self, user_id: Uuid) -> anyhow::Result<bool> {
        let paths = self.listings.image_paths_for_author(user_id).await?;
        let deleted = self.users.delete_user(user_id).await?;
        if !deleted {
            return Ok(false);
        }
        for path in &paths {
            if let Err(err) = self.images.delete_image(path).await {
                tracing::warn!(user_id = %user_id, path = %path, error = ?err, "failed to remove image during account deletion");
            }
        }
        tracing::info!(user_id = %user_id, removed_files = paths.len(), "account_deleted");
        Ok(true)
    }
}
