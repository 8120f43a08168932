use crate::application::ports::listing_repository::ListingRepository;
use crate::application::ports::rubric_repository::RubricRepository;
use crate::application::services::pagination::{Page, Paginator};
use crate::domain::listings::listing::Listing;
use crate::domain::rubrics::rubric::SubRubric;

#[derive(Debug, Clone)]
pub struct RubricPage {
    pub rubric: SubRubric,
    pub keyword: String,
    pub page: Page,
    pub items: Vec<Listing>,
}

pub struct ListRubricListings<'a, RR, LR>
where
    RR: RubricRepository + ?Sized,
    LR: ListingRepository + ?Sized,
{
    pub rubrics: &'a RR,
    pub listings: &'a LR,
    pub per_page: i64,
}

impl<'a, RR, LR> ListRubricListings<'a, RR, LR>
where
    RR: RubricRepository + ?Sized,
    LR: ListingRepository + ?Sized,
{
    /// None when `rubric_id` is not a sub rubric.
    pub async fn execute(
        &self,
        rubric_id: i64,
        keyword: Option<String>,
        page: Option<&str>,
    ) -> anyhow::Result<Option<RubricPage>> {
        let Some(rubric) = self.rubrics.get_sub_rubric(rubric_id).await? else {
            return Ok(None);
        };
        let keyword = keyword.unwrap_or_default();
        let filter = Some(keyword.as_str()).filter(|k| !k.is_empty());

        let count = self.listings.count_active_in_rubric(rubric_id, filter).await?;
        let page = Paginator::new(count, self.per_page).get_page(page);
        let items = self
            .listings
            .list_active_in_rubric(rubric_id, filter, page.offset(), page.limit())
            .await?;
        Ok(Some(RubricPage {
            rubric,
            keyword,
            page,
            items,
        }))
    }
}
