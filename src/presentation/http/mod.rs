pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod listings;
pub mod pages;
pub mod profile_listings;
pub mod rubrics;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::services::ServeDir;

use crate::bootstrap::app_context::AppContext;

/// Every route that runs on `AppContext`, with uploaded files served from
/// `/uploads`. Health, docs, CORS and tracing are layered on in `main`.
pub fn router(ctx: AppContext) -> Router {
    let accounts = Router::new()
        .merge(auth::routes(ctx.clone()))
        .merge(accounts::routes(ctx.clone()))
        .merge(profile_listings::routes(ctx.clone()));

    Router::new()
        .nest("/api/accounts", accounts)
        .nest("/api", listings::routes(ctx.clone()))
        .nest("/api", rubrics::routes(ctx.clone()))
        .nest("/api", pages::routes(ctx.clone()))
        .nest_service("/uploads", ServeDir::new(&ctx.cfg.uploads_dir))
        // Global body size limit for uploads (configurable)
        .layer(DefaultBodyLimit::max(ctx.cfg.upload_max_bytes))
}
