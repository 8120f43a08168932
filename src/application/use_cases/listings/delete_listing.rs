use uuid::Uuid;

use super::discard_files;
use crate::application::ports::image_storage::ImageStorage;
use crate::application::ports::listing_repository::ListingRepository;

pub struct DeleteListing<'a, LR, S>
where
    LR: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub listings: &'a LR,
    pub storage: &'a S,
}

impl<'a, LR, S> DeleteListing<'a, LR, S>
where
    LR: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub async fn execute(&self, author_id: Uuid, id: i64) -> anyhow::Result<bool> {
        match self.listings.delete_owned(id, author_id).await? {
            Some(paths) => {
                discard_files(self.storage, &paths).await;
                tracing::info!(listing_id = id, author_id = %author_id, "listing_deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
