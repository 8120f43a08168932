use uuid::Uuid;

use super::{discard_files, store_files};
use crate::application::errors::ServiceError;
use crate::application::forms::listing::ListingForm;
use crate::application::ports::image_storage::ImageStorage;
use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::rubric_repository::RubricRepository;
use crate::domain::listings::listing::ListingDetail;

pub struct CreateListing<'a, RR, LR, S>
where
    RR: RubricRepository + ?Sized,
    LR: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub rubrics: &'a RR,
    pub listings: &'a LR,
    pub storage: &'a S,
    pub max_file_bytes: usize,
}

impl<'a, RR, LR, S> CreateListing<'a, RR, LR, S>
where
    RR: RubricRepository + ?Sized,
    LR: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub async fn execute(
        &self,
        author_id: Uuid,
        form: ListingForm,
    ) -> Result<ListingDetail, ServiceError> {
        let rubric_exists = match form.rubric_id() {
            Some(id) => self.rubrics.get_sub_rubric(id).await?.is_some(),
            None => false,
        };
        let clean = form.clean(rubric_exists, self.max_file_bytes)?;

        let main = match &clean.image {
            Some(file) => store_files(self.storage, std::slice::from_ref(file)).await?,
            None => Vec::new(),
        };
        let extra = match store_files(self.storage, &clean.images).await {
            Ok(paths) => paths,
            Err(err) => {
                discard_files(self.storage, &main).await;
                return Err(err.into());
            }
        };

        let created = self
            .listings
            .create(author_id, &clean.fields, main.first().map(String::as_str), &extra)
            .await;
        let listing = match created {
            Ok(l) => l,
            Err(err) => {
                discard_files(self.storage, &main).await;
                discard_files(self.storage, &extra).await;
                return Err(err.into());
            }
        };
        let images = self.listings.list_images(listing.id).await?;
        tracing::info!(listing_id = listing.id, author_id = %author_id, images = images.len(), "listing_created");
        Ok(ListingDetail { listing, images })
    }
}
