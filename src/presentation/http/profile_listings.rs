use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::forms::listing::{ListingForm, UploadedFile, parse_bool};
use crate::application::use_cases::listings::create_listing::CreateListing;
use crate::application::use_cases::listings::delete_listing::DeleteListing;
use crate::application::use_cases::listings::get_own_listing::GetOwnListing;
use crate::application::use_cases::listings::update_listing::UpdateListing;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::accounts::MessageResponse;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::listings::{ListingDetailResponse, to_detail};

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingSavedResponse {
    pub message: String,
    #[serde(flatten)]
    pub listing: ListingDetailResponse,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ListingMultipart {
    /// Sub rubric id
    rubric: String,
    title: String,
    content: String,
    /// Decimal; empty means 0
    price: Option<String>,
    contacts: String,
    /// `true`/`false` (checkbox values `on`/`off` accepted); defaults to true
    is_active: Option<String>,
    /// Main image
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<String>,
    /// Set to remove the main image (ignored when a new image is uploaded)
    clear_image: Option<String>,
    /// Additional images, repeatable
    #[schema(value_type = Option<Vec<String>>, format = Binary)]
    images: Option<Vec<String>>,
    /// Ids of additional images to remove, repeatable
    delete_images: Option<Vec<String>>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/profile/listings", post(create_listing))
        .route(
            "/profile/listings/:id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .with_state(ctx)
}

async fn read_listing_form(mut multipart: Multipart) -> Result<ListingForm, ApiError> {
    let mut form = ListingForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string());
        let file_name = field.file_name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") | Some("images") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                // Browsers send an empty part for an untouched file input
                if data.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
                    continue;
                }
                let file = UploadedFile {
                    filename: file_name,
                    bytes: data.to_vec(),
                };
                if name.as_deref() == Some("image") {
                    form.image = Some(file);
                } else {
                    form.images.push(file);
                }
            }
            Some(other) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                match other {
                    "rubric" => form.rubric = Some(text),
                    "title" => form.title = Some(text),
                    "content" => form.content = Some(text),
                    "price" => form.price = Some(text),
                    "contacts" => form.contacts = Some(text),
                    "is_active" => form.is_active = Some(text),
                    "clear_image" => form.clear_image = parse_bool(&text).unwrap_or(true),
                    "delete_images" => form.delete_images.push(text),
                    _ => {}
                }
            }
            None => {}
        }
    }
    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/accounts/profile/listings",
    tag = "Profile listings",
    request_body(content = ListingMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = ListingSavedResponse),
        (status = 422, description = "Invalid form")
    )
)]
pub async fn create_listing(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ListingSavedResponse>), ApiError> {
    let user_id = user.id;
    let form = read_listing_form(multipart).await?;
    let rubrics = ctx.rubric_repo();
    let listings = ctx.listing_repo();
    let storage = ctx.image_storage();
    let uc = CreateListing {
        rubrics: rubrics.as_ref(),
        listings: listings.as_ref(),
        storage: storage.as_ref(),
        max_file_bytes: ctx.cfg.upload_max_bytes,
    };
    let detail = uc.execute(user_id, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ListingSavedResponse {
            message: "Listing added".into(),
            listing: to_detail(&ctx.cfg, detail),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/accounts/profile/listings/{id}",
    tag = "Profile listings",
    params(("id" = i64, Path, description = "Listing id")),
    responses(
        (status = 200, body = ListingDetailResponse),
        (status = 404, description = "Not found or not yours")
    )
)]
pub async fn get_listing(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ListingDetailResponse>, ApiError> {
    let user_id = user.id;
    let repo = ctx.listing_repo();
    let uc = GetOwnListing {
        repo: repo.as_ref(),
    };
    let detail = uc.execute(user_id, id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(to_detail(&ctx.cfg, detail)))
}

#[utoipa::path(
    put,
    path = "/api/accounts/profile/listings/{id}",
    tag = "Profile listings",
    params(("id" = i64, Path, description = "Listing id")),
    request_body(content = ListingMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ListingSavedResponse),
        (status = 404, description = "Not found or not yours"),
        (status = 422, description = "Invalid form")
    )
)]
pub async fn update_listing(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ListingSavedResponse>, ApiError> {
    let user_id = user.id;
    let form = read_listing_form(multipart).await?;
    let rubrics = ctx.rubric_repo();
    let listings = ctx.listing_repo();
    let storage = ctx.image_storage();
    let uc = UpdateListing {
        rubrics: rubrics.as_ref(),
        listings: listings.as_ref(),
        storage: storage.as_ref(),
        max_file_bytes: ctx.cfg.upload_max_bytes,
    };
    let detail = uc.execute(user_id, id, form).await?;
    Ok(Json(ListingSavedResponse {
        message: "Listing updated".into(),
        listing: to_detail(&ctx.cfg, detail),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/accounts/profile/listings/{id}",
    tag = "Profile listings",
    params(("id" = i64, Path, description = "Listing id")),
    responses(
        (status = 200, description = "Deleted with its images", body = MessageResponse),
        (status = 404, description = "Not found or not yours")
    )
)]
pub async fn delete_listing(
    State(ctx): State<AppContext>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = user.id;
    let listings = ctx.listing_repo();
    let storage = ctx.image_storage();
    let uc = DeleteListing {
        listings: listings.as_ref(),
        storage: storage.as_ref(),
    };
    if !uc.execute(user_id, id).await? {
        return Err(ApiError::NotFound);
    }
    Ok(Json(MessageResponse {
        message: "Listing deleted".into(),
    }))
}
