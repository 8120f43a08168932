use uuid::Uuid;

use super::{discard_files, store_files};
use crate::application::errors::ServiceError;
use crate::application::forms::listing::ListingForm;
use crate::application::ports::image_storage::ImageStorage;
use crate::application::ports::listing_repository::{ListingRepository, ListingUpdate};
use crate::application::ports::rubric_repository::RubricRepository;
use crate::domain::listings::listing::ListingDetail;

pub struct UpdateListing<'a, RR, LR, S>
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

impl<'a, RR, LR, S> UpdateListing<'a, RR, LR, S>
where
    RR: RubricRepository + ?Sized,
    LR: ListingRepository + ?Sized,
    S: ImageStorage + ?Sized,
{
    pub async fn execute(
        &self,
        author_id: Uuid,
        id: i64,
        form: ListingForm,
    ) -> Result<ListingDetail, ServiceError> {
        if self.listings.get_owned(id, author_id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }
        let rubric_exists = match form.rubric_id() {
            Some(rid) => self.rubrics.get_sub_rubric(rid).await?.is_some(),
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

        // A new upload wins over clear_image
        let image = match main.first() {
            Some(path) => Some(Some(path.clone())),
            None if clean.clear_image => Some(None),
            None => None,
        };
        let update = ListingUpdate {
            fields: clean.fields,
            image,
            add_images: extra.clone(),
            remove_image_ids: clean.delete_images,
        };

        let updated = match self.listings.update_owned(id, author_id, &update).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                discard_files(self.storage, &main).await;
                discard_files(self.storage, &extra).await;
                return Err(ServiceError::NotFound);
            }
            Err(err) => {
                discard_files(self.storage, &main).await;
                discard_files(self.storage, &extra).await;
                return Err(err.into());
            }
        };
        discard_files(self.storage, &updated.orphaned_paths).await;

        let images = self.listings.list_images(id).await?;
        tracing::info!(listing_id = id, author_id = %author_id, "listing_updated");
        Ok(ListingDetail {
            listing: updated.listing,
            images,
        })
    }
}
