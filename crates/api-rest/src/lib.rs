//! # API REST
//!
//! REST API and HTML pages for the newsdesk site.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Server-rendered home and article pages
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, bearer auth)
//!
//! Uses `api-shared` for request/response types and `newsdesk-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod pages;
pub mod routes;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use newsdesk_core::config::{home_limit_from_env_value, imgbb_from_env_values, resolve_data_dir};
use newsdesk_core::{
    image_host_from_config, CoreConfig, DocumentStore, FileDocumentStore, LocalIdentityProvider,
    NewsService,
};

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NewsService>,
}

impl AppState {
    /// Wires the file store, local identity provider and configured image host.
    pub fn from_config(cfg: CoreConfig) -> Self {
        let cfg = Arc::new(cfg);
        let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(cfg.data_dir()));
        let identity = Arc::new(LocalIdentityProvider::new(store.clone()));
        let images = image_host_from_config(&cfg);
        if images.is_none() {
            tracing::warn!("IMGBB_API_KEY not set, image uploads are disabled");
        }

        Self {
            service: Arc::new(NewsService::new(cfg, store, identity, images)),
        }
    }
}

/// Resolves the core configuration from the process environment.
///
/// # Environment Variables
/// - `NEWSDESK_DATA_DIR`: Document store root (default: "news_data")
/// - `NEWSDESK_HOME_LIMIT`: Articles on the home page (default: 20)
/// - `IMGBB_API_KEY`: Enables image uploads when set
/// - `IMGBB_UPLOAD_URL`: Upload endpoint override
pub fn config_from_env() -> anyhow::Result<CoreConfig> {
    let data_dir = resolve_data_dir(std::env::var("NEWSDESK_DATA_DIR").ok())?;
    let home_limit = home_limit_from_env_value(std::env::var("NEWSDESK_HOME_LIMIT").ok())?;
    let imgbb = imgbb_from_env_values(
        std::env::var("IMGBB_API_KEY").ok(),
        std::env::var("IMGBB_UPLOAD_URL").ok(),
    );
    Ok(CoreConfig::new(data_dir, home_limit, imgbb)?)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        routes::list_articles,
        routes::create_article,
        routes::get_article,
        routes::update_article,
        routes::delete_article,
        routes::list_comments,
        routes::add_comment,
        routes::upload_image,
        routes::register,
        routes::login,
        routes::logout,
        routes::me,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::SegmentRes,
        api_shared::SourceLinkRes,
        api_shared::ArticleSummaryRes,
        api_shared::ListArticlesRes,
        api_shared::ArticleRes,
        api_shared::CreateArticleReq,
        api_shared::UpdateArticleReq,
        api_shared::CommentReq,
        api_shared::CommentRes,
        api_shared::ListCommentsRes,
        api_shared::AuthReq,
        api_shared::SessionRes,
        api_shared::ProfileRes,
        api_shared::UploadRes,
    )),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Builds the full router: pages, JSON API and Swagger UI.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/", get(routes::root))
        .route("/home", get(routes::home_page))
        .route("/:slug", get(routes::article_page))
        .route(
            "/api/articles",
            get(routes::list_articles).post(routes::create_article),
        )
        .route(
            "/api/articles/:slug",
            get(routes::get_article)
                .put(routes::update_article)
                .delete(routes::delete_article),
        )
        .route(
            "/api/articles/:slug/comments",
            get(routes::list_comments).post(routes::add_comment),
        )
        .route("/api/images", post(routes::upload_image))
        .route("/api/auth/register", post(routes::register))
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/auth/me", get(routes::me))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
