use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::use_cases::pages::get_page::GetPage;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse {
    pub name: String,
    pub title: Option<String>,
    pub html: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/pages/:page", get(get_page))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/pages/{page}", tag = "Pages", security(()),
    params(("page" = String, Path, description = "Page name, e.g. `about`")),
    responses(
        (status = 200, body = PageResponse),
        (status = 404, description = "No such page")
    ))]
pub async fn get_page(
    State(ctx): State<AppContext>,
    Path(page): Path<String>,
) -> Result<Json<PageResponse>, ApiError> {
    let store = ctx.page_store();
    let uc = GetPage {
        store: store.as_ref(),
    };
    let rendered = uc.execute(&page).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(PageResponse {
        name: page,
        title: rendered.title,
        html: rendered.html,
    }))
}
