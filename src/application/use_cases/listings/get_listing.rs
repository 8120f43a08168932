use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::ListingDetail;

pub struct GetListing<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> GetListing<'a, R> {
    /// Public detail: hidden listings and listings filed under another rubric are not found.
    pub async fn execute(&self, rubric_id: i64, id: i64) -> anyhow::Result<Option<ListingDetail>> {
        let listing = match self.repo.get_by_id(id).await? {
            Some(l) if l.is_active && l.rubric_id == rubric_id => l,
            _ => return Ok(None),
        };
        let images = self.repo.list_images(listing.id).await?;
        Ok(Some(ListingDetail { listing, images }))
    }
}
