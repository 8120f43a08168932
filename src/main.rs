use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use esboard::bootstrap::app_context::{AppContext, AppServices};
use esboard::bootstrap::config::Config;
use esboard::infrastructure::db::repositories::listing_repository_sqlx::SqlxListingRepository;
use esboard::infrastructure::db::repositories::rubric_repository_sqlx::SqlxRubricRepository;
use esboard::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use esboard::infrastructure::notify::LogActivationNotifier;
use esboard::infrastructure::pages::FsPageStore;
use esboard::infrastructure::storage::port_impl::FsImageStorage;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            esboard::presentation::http::auth::register,
            esboard::presentation::http::auth::register_done,
            esboard::presentation::http::auth::activate,
            esboard::presentation::http::auth::login,
            esboard::presentation::http::auth::logout,
            esboard::presentation::http::accounts::get_profile,
            esboard::presentation::http::accounts::update_profile,
            esboard::presentation::http::accounts::delete_profile,
            esboard::presentation::http::accounts::change_password,
            esboard::presentation::http::profile_listings::create_listing,
            esboard::presentation::http::profile_listings::get_listing,
            esboard::presentation::http::profile_listings::update_listing,
            esboard::presentation::http::profile_listings::delete_listing,
            esboard::presentation::http::listings::latest,
            esboard::presentation::http::listings::by_rubric,
            esboard::presentation::http::listings::detail,
            esboard::presentation::http::rubrics::list_rubrics,
            esboard::presentation::http::pages::get_page,
            esboard::presentation::http::health::health,
        ),
        components(schemas(
            esboard::presentation::http::auth::RegisterRequest,
            esboard::presentation::http::auth::RegisterResponse,
            esboard::presentation::http::auth::RegisterDoneResponse,
            esboard::presentation::http::auth::ActivationResponse,
            esboard::presentation::http::auth::LoginRequest,
            esboard::presentation::http::auth::LoginResponse,
            esboard::presentation::http::auth::UserResponse,
            esboard::presentation::http::accounts::ProfileResponse,
            esboard::presentation::http::accounts::ProfileUpdateRequest,
            esboard::presentation::http::accounts::PasswordChangeRequest,
            esboard::presentation::http::accounts::MessageResponse,
            esboard::presentation::http::accounts::ProfileUpdatedResponse,
            esboard::presentation::http::profile_listings::ListingSavedResponse,
            esboard::presentation::http::profile_listings::ListingMultipart,
            esboard::presentation::http::listings::ListingSummary,
            esboard::presentation::http::listings::ImageItem,
            esboard::presentation::http::listings::ListingDetailResponse,
            esboard::presentation::http::listings::PageInfo,
            esboard::presentation::http::listings::RubricListingsResponse,
            esboard::presentation::http::rubrics::SubRubricItem,
            esboard::presentation::http::rubrics::SuperRubricItem,
            esboard::presentation::http::pages::PageResponse,
            esboard::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Accounts", description = "Registration, activation, sessions and profile"),
            (name = "Profile listings", description = "Listings owned by the logged-in user"),
            (name = "Listings", description = "Public listings"),
            (name = "Rubrics", description = "Rubric navigation"),
            (name = "Pages", description = "Static pages"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

const CORS_METHODS: [http::Method; 6] = [
    http::Method::GET,
    http::Method::POST,
    http::Method::PUT,
    http::Method::DELETE,
    http::Method::PATCH,
    http::Method::OPTIONS,
];

fn build_cors(cfg: &Config) -> CorsLayer {
    let headers = [http::header::CONTENT_TYPE, http::header::AUTHORIZATION];
    if let Some(origin) = cfg.frontend_url.clone() {
        match HeaderValue::from_str(&origin) {
            Ok(v) => CorsLayer::new()
                .allow_origin(v)
                .allow_methods(CORS_METHODS)
                .allow_headers(headers)
                .allow_credentials(true),
            Err(_) => CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods(CORS_METHODS)
                .allow_headers(headers)
                .allow_credentials(true),
        }
    } else if cfg.is_production {
        // FRONTEND_URL is enforced in production; deny all if it is somehow missing
        CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
            .allow_methods(CORS_METHODS)
            .allow_headers(headers)
    } else {
        // Development convenience
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(CORS_METHODS)
            .allow_headers(headers)
            .allow_credentials(true)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "esboard=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        port = cfg.api_port,
        uploads = %cfg.uploads_dir,
        pages = %cfg.pages_dir,
        production = cfg.is_production,
        "Starting esboard"
    );

    // Database
    let pool = esboard::infrastructure::db::connect_pool(&cfg.database_url).await?;
    esboard::infrastructure::db::migrate(&pool).await?;

    // Ensure uploads dir exists
    if let Err(e) = tokio::fs::create_dir_all(&cfg.uploads_dir).await {
        tracing::warn!(error=?e, dir=%cfg.uploads_dir, "Failed to create uploads dir");
    }

    let services = AppServices::new(
        Arc::new(SqlxUserRepository::new(pool.clone())),
        Arc::new(SqlxRubricRepository::new(pool.clone())),
        Arc::new(SqlxListingRepository::new(pool.clone())),
        Arc::new(FsImageStorage::new(&cfg.uploads_dir)),
        Arc::new(LogActivationNotifier),
        Arc::new(FsPageStore::new(&cfg.pages_dir)),
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest(
            "/api",
            esboard::presentation::http::health::routes(pool.clone(), &cfg.uploads_dir),
        )
        .merge(esboard::presentation::http::router(ctx))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to install shutdown handler");
        return;
    }
    info!("shutdown signal received");
}
