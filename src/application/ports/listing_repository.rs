use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::listings::listing::{AdditionalImage, Listing, ListingFields};

#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub fields: ListingFields,
    // None => keep; Some(None) => clear; Some(Some(path)) => replace
    pub image: Option<Option<String>>,
    pub add_images: Vec<String>,
    pub remove_image_ids: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct UpdatedListing {
    pub listing: Listing,
    /// Stored files no longer referenced after the update.
    pub orphaned_paths: Vec<String>,
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn list_latest_active(&self, limit: i64) -> anyhow::Result<Vec<Listing>>;

    async fn count_active_in_rubric(
        &self,
        rubric_id: i64,
        keyword: Option<&str>,
    ) -> anyhow::Result<i64>;

    /// Newest first. `keyword` matches title or content, case-insensitively.
    async fn list_active_in_rubric(
        &self,
        rubric_id: i64,
        keyword: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Listing>>;

    async fn list_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Listing>>;

    async fn get_by_id(&self, id: i64) -> anyhow::Result<Option<Listing>>;

    async fn get_owned(&self, id: i64, author_id: Uuid) -> anyhow::Result<Option<Listing>>;

    async fn list_images(&self, listing_id: i64) -> anyhow::Result<Vec<AdditionalImage>>;

    async fn create(
        &self,
        author_id: Uuid,
        fields: &ListingFields,
        image: Option<&str>,
        extra_images: &[String],
    ) -> anyhow::Result<Listing>;

    /// None when the listing does not exist or belongs to someone else.
    async fn update_owned(
        &self,
        id: i64,
        author_id: Uuid,
        update: &ListingUpdate,
    ) -> anyhow::Result<Option<UpdatedListing>>;

    /// Returns the stored paths of the deleted listing, None if not found/not owned.
    async fn delete_owned(&self, id: i64, author_id: Uuid) -> anyhow::Result<Option<Vec<String>>>;

    /// Every stored path (main and additional images) across an author's listings.
    async fn image_paths_for_author(&self, author_id: Uuid) -> anyhow::Result<Vec<String>>;
}
