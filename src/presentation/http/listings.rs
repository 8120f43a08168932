use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::services::pagination::Page;
use crate::application::use_cases::listings::get_listing::GetListing;
use crate::application::use_cases::listings::list_latest::ListLatest;
use crate::application::use_cases::listings::list_rubric_listings::ListRubricListings;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::listings::listing::{AdditionalImage, Listing, ListingDetail};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::rubrics::SubRubricItem;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingSummary {
    pub id: i64,
    pub rubric_id: i64,
    pub rubric_name: String,
    pub title: String,
    pub content: String,
    pub price: f64,
    pub contacts: String,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageItem {
    pub id: i64,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDetailResponse {
    #[serde(flatten)]
    pub listing: ListingSummary,
    pub images: Vec<ImageItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageInfo {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<i64>,
    pub previous_page_number: Option<i64>,
    pub start_index: i64,
    pub end_index: i64,
}

impl From<Page> for PageInfo {
    fn from(p: Page) -> Self {
        Self {
            number: p.number,
            num_pages: p.num_pages,
            count: p.count,
            per_page: p.per_page,
            has_next: p.has_next(),
            has_previous: p.has_previous(),
            next_page_number: p.next_page_number(),
            previous_page_number: p.previous_page_number(),
            start_index: p.start_index(),
            end_index: p.end_index(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RubricListingsResponse {
    pub rubric: SubRubricItem,
    pub keyword: String,
    pub page: PageInfo,
    pub items: Vec<ListingSummary>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RubricQuery {
    /// Case-insensitive substring matched against title and content
    pub keyword: Option<String>,
    /// Page number; out-of-range values show the last page
    pub page: Option<String>,
}

/// URL under which an uploaded file is served.
pub fn upload_url(cfg: &Config, relative_path: &str) -> String {
    let path = format!("/uploads/{}", relative_path.trim_start_matches('/'));
    match cfg.public_base_url.as_deref() {
        Some(base) => format!("{base}{path}"),
        None => path,
    }
}

pub fn to_summary(cfg: &Config, l: Listing) -> ListingSummary {
    ListingSummary {
        image_url: l.image.as_deref().map(|p| upload_url(cfg, p)),
        id: l.id,
        rubric_id: l.rubric_id,
        rubric_name: l.rubric_name,
        title: l.title,
        content: l.content,
        price: l.price,
        contacts: l.contacts,
        author_id: l.author_id,
        is_active: l.is_active,
        created_at: l.created_at,
    }
}

fn to_image(cfg: &Config, img: AdditionalImage) -> ImageItem {
    ImageItem {
        url: upload_url(cfg, &img.image),
        id: img.id,
    }
}

pub fn to_detail(cfg: &Config, d: ListingDetail) -> ListingDetailResponse {
    ListingDetailResponse {
        listing: to_summary(cfg, d.listing),
        images: d.images.into_iter().map(|i| to_image(cfg, i)).collect(),
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/listings", get(latest))
        .route("/rubrics/:rubric_id", get(by_rubric))
        .route("/rubrics/:rubric_id/:id", get(detail))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/listings", tag = "Listings", security(()), responses(
    (status = 200, body = [ListingSummary])
))]
pub async fn latest(State(ctx): State<AppContext>) -> Result<Json<Vec<ListingSummary>>, ApiError> {
    let repo = ctx.listing_repo();
    let uc = ListLatest {
        repo: repo.as_ref(),
    };
    let items = uc.execute(ctx.cfg.latest_listings_limit).await?;
    Ok(Json(
        items.into_iter().map(|l| to_summary(&ctx.cfg, l)).collect(),
    ))
}

#[utoipa::path(get, path = "/api/rubrics/{rubric_id}", tag = "Listings", security(()),
    params(("rubric_id" = i64, Path, description = "Sub rubric id"), RubricQuery),
    responses(
        (status = 200, body = RubricListingsResponse),
        (status = 404, description = "Not a sub rubric")
    ))]
pub async fn by_rubric(
    State(ctx): State<AppContext>,
    Path(rubric_id): Path<i64>,
    Query(q): Query<RubricQuery>,
) -> Result<Json<RubricListingsResponse>, ApiError> {
    let rubrics = ctx.rubric_repo();
    let listings = ctx.listing_repo();
    let uc = ListRubricListings {
        rubrics: rubrics.as_ref(),
        listings: listings.as_ref(),
        per_page: ctx.cfg.listings_per_page,
    };
    let page = uc
        .execute(rubric_id, q.keyword, q.page.as_deref())
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(RubricListingsResponse {
        rubric: page.rubric.into(),
        keyword: page.keyword,
        page: page.page.into(),
        items: page
            .items
            .into_iter()
            .map(|l| to_summary(&ctx.cfg, l))
            .collect(),
    }))
}

#[utoipa::path(get, path = "/api/rubrics/{rubric_id}/{id}", tag = "Listings", security(()),
    params(
        ("rubric_id" = i64, Path, description = "Sub rubric id"),
        ("id" = i64, Path, description = "Listing id")
    ),
    responses(
        (status = 200, body = ListingDetailResponse),
        (status = 404, description = "Not found")
    ))]
pub async fn detail(
    State(ctx): State<AppContext>,
    Path((rubric_id, id)): Path<(i64, i64)>,
) -> Result<Json<ListingDetailResponse>, ApiError> {
    let repo = ctx.listing_repo();
    let uc = GetListing {
        repo: repo.as_ref(),
    };
    let detail = uc.execute(rubric_id, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(to_detail(&ctx.cfg, detail)))
}
