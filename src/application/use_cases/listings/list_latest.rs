use crate::application::ports::listing_repository::ListingRepository;
use crate::domain::listings::listing::Listing;

pub struct ListLatest<'a, R: ListingRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: ListingRepository + ?Sized> ListLatest<'a, R> {
    pub async fn execute(&self, limit: i64) -> anyhow::Result<Vec<Listing>> {
        self.repo.list_latest_active(limit.max(0)).await
    }
}
