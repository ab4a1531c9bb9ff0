//! HTTP handlers.

use axum::{
    extract::{Multipart, Path as AxumPath, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
};

use api_shared::auth::bearer_token;
use api_shared::{
    ArticleRes, ArticleSummaryRes, AuthReq, CommentReq, CommentRes, CreateArticleReq, HealthRes,
    HealthService, ListArticlesRes, ListCommentsRes, ProfileRes, SessionRes, UpdateArticleReq,
    UploadRes,
};
use newsdesk_core::{NewsError, Viewer};

use crate::error::{api_error, ApiError};
use crate::pages;
use crate::AppState;

/// Resolves the bearer token on the request to a signed-in viewer.
fn viewer(state: &AppState, headers: &HeaderMap) -> Result<Viewer, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| api_error("Auth", NewsError::Unauthenticated))?;
    state
        .service
        .authenticate(token)
        .map_err(|e| api_error("Auth", e))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

// ----------------------------------------------------------------------------
// Pages
// ----------------------------------------------------------------------------

pub async fn root() -> Redirect {
    Redirect::to("/home")
}

/// Home page: latest articles and the headline ticker.
#[axum::debug_handler]
pub async fn home_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let view = state.service.home().map_err(|e| api_error("Home page", e))?;
    Ok(Html(pages::home_page(&view)))
}

/// Article page. Unknown slugs send the reader back to the home page.
#[axum::debug_handler]
pub async fn article_page(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
) -> Response {
    match state.service.article_view(&slug) {
        Ok(view) => Html(pages::article_page(&view)).into_response(),
        Err(NewsError::NotFound(_)) => {
            tracing::debug!("no article '{}', redirecting home", slug);
            Redirect::to("/home").into_response()
        }
        Err(e) => api_error("Article page", e).into_response(),
    }
}

// ----------------------------------------------------------------------------
// Articles
// ----------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/articles",
    responses(
        (status = 200, description = "Latest articles, newest first", body = ListArticlesRes),
        (status = 500, description = "Internal server error")
    )
)]
/// List the latest articles
#[axum::debug_handler]
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<Json<ListArticlesRes>, ApiError> {
    let articles = state
        .service
        .latest(state.service.config().home_limit())
        .map_err(|e| api_error("List articles", e))?;
    Ok(Json(ListArticlesRes {
        articles: articles.into_iter().map(ArticleSummaryRes::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/articles",
    request_body = CreateArticleReq,
    responses(
        (status = 201, description = "Article published", body = ArticleRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
        (status = 409, description = "Slug already taken"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = []))
)]
/// Publish a new article
///
/// The slug is lower-cased and must contain only letters, digits and `-`.
#[axum::debug_handler]
pub async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateArticleReq>,
) -> Result<(StatusCode, Json<ArticleRes>), ApiError> {
    let viewer = viewer(&state, &headers)?;
    let (slug, draft, image_url) = req.into_parts();

    let article = state
        .service
        .publish(&viewer, &slug, draft, image_url)
        .map_err(|e| api_error("Create article", e))?;
    let view = state
        .service
        .article_view(article.slug.as_str())
        .map_err(|e| api_error("Create article", e))?;

    Ok((StatusCode::CREATED, Json(ArticleRes::from(view))))
}

#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article with rendered segments", body = ArticleRes),
        (status = 404, description = "No such article"),
        (status = 500, description = "Internal server error")
    )
)]
/// Read one article
///
/// The body is returned both raw (`fullDesc`) and split into text and image segments.
#[axum::debug_handler]
pub async fn get_article(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
) -> Result<Json<ArticleRes>, ApiError> {
    let view = state
        .service
        .article_view(&slug)
        .map_err(|e| api_error("Get article", e))?;
    Ok(Json(ArticleRes::from(view)))
}

#[utoipa::path(
    put,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    request_body = UpdateArticleReq,
    responses(
        (status = 200, description = "Article updated", body = ArticleRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such article"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_article(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateArticleReq>,
) -> Result<Json<ArticleRes>, ApiError> {
    let viewer = viewer(&state, &headers)?;
    let (draft, image_url) = req.into_parts();

    state
        .service
        .edit(&viewer, &slug, draft, image_url)
        .map_err(|e| api_error("Update article", e))?;
    let view = state
        .service
        .article_view(&slug)
        .map_err(|e| api_error("Update article", e))?;

    Ok(Json(ArticleRes::from(view)))
}

#[utoipa::path(
    delete,
    path = "/api/articles/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 204, description = "Article and its comments deleted"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such article"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_article(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let viewer = viewer(&state, &headers)?;
    state
        .service
        .remove(&viewer, &slug)
        .map_err(|e| api_error("Delete article", e))?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------------
// Comments
// ----------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/articles/{slug}/comments",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Comments, newest first", body = ListCommentsRes),
        (status = 404, description = "No such article"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn list_comments(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
) -> Result<Json<ListCommentsRes>, ApiError> {
    let comments = state
        .service
        .comments(&slug)
        .map_err(|e| api_error("List comments", e))?;
    Ok(Json(ListCommentsRes {
        comments: comments.into_iter().map(CommentRes::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/articles/{slug}/comments",
    params(("slug" = String, Path, description = "Article slug")),
    request_body = CommentReq,
    responses(
        (status = 201, description = "Comment added", body = CommentRes),
        (status = 400, description = "Empty comment"),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No such article"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn add_comment(
    State(state): State<AppState>,
    AxumPath(slug): AxumPath<String>,
    headers: HeaderMap,
    Json(req): Json<CommentReq>,
) -> Result<(StatusCode, Json<CommentRes>), ApiError> {
    let viewer = viewer(&state, &headers)?;
    let comment = state
        .service
        .add_comment(&viewer, &slug, &req.text)
        .map_err(|e| api_error("Add comment", e))?;
    Ok((StatusCode::CREATED, Json(CommentRes::from(comment))))
}

// ----------------------------------------------------------------------------
// Images
// ----------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Image file in the `image` field"),
    responses(
        (status = 200, description = "Hosted image URL", body = UploadRes),
        (status = 400, description = "Missing or empty image"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Not an admin"),
        (status = 502, description = "Image host rejected the upload"),
        (status = 503, description = "Image uploads are not configured")
    ),
    security(("bearer" = []))
)]
/// Upload an image to the image host
///
/// The returned URL can be used as a cover image or inserted into a body as `[IMG:<url>]`.
#[axum::debug_handler]
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<UploadRes>, ApiError> {
    let viewer = viewer(&state, &headers)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Upload image multipart error: {}", e);
        (StatusCode::BAD_REQUEST, "Invalid multipart body")
    })? {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("image").to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid multipart body"))?;

        let url = state
            .service
            .upload_image(&viewer, &file_name, bytes.to_vec())
            .await
            .map_err(|e| api_error("Upload image", e))?;
        return Ok(Json(UploadRes { url }));
    }

    Err((StatusCode::BAD_REQUEST, "Missing image field"))
}

// ----------------------------------------------------------------------------
// Auth
// ----------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = AuthReq,
    responses(
        (status = 201, description = "Account created and signed in", body = SessionRes),
        (status = 400, description = "Invalid email or password too short"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<AuthReq>,
) -> Result<(StatusCode, Json<SessionRes>), ApiError> {
    let session = state
        .service
        .register(&req.email, &req.password)
        .map_err(|e| api_error("Register", e))?;
    Ok((StatusCode::CREATED, Json(SessionRes::from(session))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = AuthReq,
    responses(
        (status = 200, description = "Signed in", body = SessionRes),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<AuthReq>,
) -> Result<Json<SessionRes>, ApiError> {
    let session = state
        .service
        .login(&req.email, &req.password)
        .map_err(|e| api_error("Login", e))?;
    Ok(Json(SessionRes::from(session)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    viewer(&state, &headers)?;
    if let Some(token) = bearer_token(&headers) {
        state
            .service
            .logout(token)
            .map_err(|e| api_error("Logout", e))?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current profile", body = ProfileRes),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = []))
)]
/// The signed-in user's profile, including the admin flag
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileRes>, ApiError> {
    let viewer = viewer(&state, &headers)?;
    Ok(Json(ProfileRes::from(viewer.profile)))
}
