use uuid::Uuid;

use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::ListingDetail;

pub struct GetOwnListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> GetOwnListing<'a, R> {
    pub async fn execute(&self, author_id: Uuid, id: i64) -> anyhow::Result<Option<ListingDetail>> {
        let Some(listing) = self.repo.get_owned(id, author_id).await? else {
            return Ok(None);
        };
        let images = self.repo.list_images(listing.id).await?;
        Ok(Some(ListingDetail { listing, images }))
    }
}
