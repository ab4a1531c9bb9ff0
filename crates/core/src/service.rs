//! Site operations.
//!
//! [`NewsService`] ties the repositories, identity provider and image host together and
//! enforces who may do what. Handlers in the API crate call into it and only translate
//! results to HTTP.

use crate::config::CoreConfig;
use crate::constants::{RESERVED_SLUGS, TICKER_ITEMS};
use crate::content::{parse_content, ContentSegment};
use crate::error::{NewsError, NewsResult};
use crate::identity::{IdentityProvider, IdentityUser, Session};
use crate::images::ImageHost;
use crate::models::{Article, ArticleDraft, Comment, UserProfile};
use crate::repositories::articles::ArticleRepository;
use crate::repositories::comments::CommentRepository;
use crate::repositories::users::UserRepository;
use crate::sources::{ensure_protocol, parse_sources};
use crate::store::DocumentStore;
use newsdesk_types::{EmailAddress, Slug};
use std::sync::Arc;

/// The signed-in user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user: IdentityUser,
    pub profile: UserProfile,
}

impl Viewer {
    pub fn is_admin(&self) -> bool {
        self.profile.is_admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    /// The source as the editor typed it.
    pub label: String,
    pub href: String,
}

/// Everything the article page shows.
#[derive(Debug, Clone)]
pub struct ArticleView {
    pub article: Article,
    pub segments: Vec<ContentSegment>,
    pub sources: Vec<SourceLink>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerItem {
    pub title: String,
    pub slug: Slug,
}

/// Everything the home page shows.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub articles: Vec<Article>,
    pub ticker: Vec<TickerItem>,
}

#[derive(Clone)]
pub struct NewsService {
    cfg: Arc<CoreConfig>,
    articles: ArticleRepository,
    comments: CommentRepository,
    users: UserRepository,
    identity: Arc<dyn IdentityProvider>,
    images: Option<Arc<dyn ImageHost>>,
}

impl NewsService {
    pub fn new(
        cfg: Arc<CoreConfig>,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        images: Option<Arc<dyn ImageHost>>,
    ) -> Self {
        Self {
            cfg,
            articles: ArticleRepository::new(store.clone()),
            comments: CommentRepository::new(store.clone()),
            users: UserRepository::new(store),
            identity,
            images,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    // ------------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------------

    pub fn register(&self, email: &str, password: &str) -> NewsResult<Session> {
        let email = EmailAddress::parse(email)?;
        self.identity.sign_up(&email, password)
    }

    pub fn login(&self, email: &str, password: &str) -> NewsResult<Session> {
        let email = EmailAddress::parse(email)?;
        self.identity.sign_in(&email, password)
    }

    pub fn logout(&self, token: &str) -> NewsResult<()> {
        self.identity.sign_out(token)
    }

    /// Resolves a session token to a viewer, creating the profile on first sight.
    pub fn authenticate(&self, token: &str) -> NewsResult<Viewer> {
        let user = self.identity.verify(token)?;
        let profile = self.users.get_or_create(&user.uid, &user.email)?;
        Ok(Viewer { user, profile })
    }

    fn require_admin(viewer: &Viewer) -> NewsResult<()> {
        if !viewer.is_admin() {
            tracing::warn!("user {} attempted an admin action", viewer.user.uid);
            return Err(NewsError::PermissionDenied);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------------

    /// Latest articles plus the headline ticker.
    pub fn home(&self) -> NewsResult<HomeView> {
        let articles = self.articles.latest(self.cfg.home_limit())?;
        let ticker = articles
            .iter()
            .take(TICKER_ITEMS)
            .map(|a| TickerItem {
                title: a.title.clone(),
                slug: a.slug.clone(),
            })
            .collect();
        Ok(HomeView { articles, ticker })
    }

    pub fn latest(&self, limit: usize) -> NewsResult<Vec<Article>> {
        self.articles.latest(limit.min(self.cfg.home_limit()))
    }

    /// The article with its body split into segments, parsed sources and comments.
    pub fn article_view(&self, slug: &str) -> NewsResult<ArticleView> {
        let slug = parse_existing_slug(slug)?;
        let article = self.articles.require(&slug)?;
        let comments = self.comments.list_for(&slug)?;
        let segments = parse_content(&article.full_desc);
        let sources = parse_sources(&article.sources)
            .into_iter()
            .map(|label| SourceLink {
                href: ensure_protocol(&label),
                label,
            })
            .collect();

        Ok(ArticleView {
            article,
            segments,
            sources,
            comments,
        })
    }

    pub fn comments(&self, slug: &str) -> NewsResult<Vec<Comment>> {
        let slug = parse_existing_slug(slug)?;
        self.articles.require(&slug)?;
        self.comments.list_for(&slug)
    }

    // ------------------------------------------------------------------------
    // Writing
    // ------------------------------------------------------------------------

    /// Publishes a new article. The requested slug is lower-cased before validation.
    pub fn publish(
        &self,
        viewer: &Viewer,
        requested_slug: &str,
        draft: ArticleDraft,
        image_url: Option<String>,
    ) -> NewsResult<Article> {
        Self::require_admin(viewer)?;
        let slug = Slug::parse(&requested_slug.trim().to_lowercase())?;
        if RESERVED_SLUGS.contains(&slug.as_str()) {
            return Err(NewsError::InvalidInput(format!(
                "slug '{}' is reserved",
                slug
            )));
        }
        self.articles
            .create(slug, draft, image_url.unwrap_or_default(), &viewer.user.uid)
    }

    pub fn edit(
        &self,
        viewer: &Viewer,
        slug: &str,
        draft: ArticleDraft,
        new_image_url: Option<String>,
    ) -> NewsResult<Article> {
        Self::require_admin(viewer)?;
        self.articles
            .update(&parse_existing_slug(slug)?, draft, new_image_url)
    }

    pub fn remove(&self, viewer: &Viewer, slug: &str) -> NewsResult<()> {
        Self::require_admin(viewer)?;
        self.articles.delete(&parse_existing_slug(slug)?)
    }

    pub fn add_comment(&self, viewer: &Viewer, slug: &str, text: &str) -> NewsResult<Comment> {
        let slug = parse_existing_slug(slug)?;
        self.comments
            .add(&slug, &viewer.user.uid, &viewer.user.email, text)
    }

    /// Forwards an image to the configured host and returns its URL.
    pub async fn upload_image(
        &self,
        viewer: &Viewer,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> NewsResult<String> {
        Self::require_admin(viewer)?;
        let host = self
            .images
            .as_ref()
            .ok_or(NewsError::ImageHostNotConfigured)?;
        host.upload(file_name, bytes).await
    }
}

/// A slug in a URL that fails validation cannot name a stored article.
fn parse_existing_slug(slug: &str) -> NewsResult<Slug> {
    Slug::parse(slug).map_err(|_| NewsError::NotFound(format!("article '{}'", slug)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::LocalIdentityProvider;
    use crate::store::FileDocumentStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedImageHost;

    #[async_trait]
    impl ImageHost for FixedImageHost {
        async fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> NewsResult<String> {
            Ok(format!("https://images.example/{file_name}"))
        }
    }

    fn service(temp_dir: &TempDir, images: Option<Arc<dyn ImageHost>>) -> NewsService {
        let cfg = Arc::new(CoreConfig::new(temp_dir.path().to_path_buf(), 20, None).unwrap());
        let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(temp_dir.path()));
        let identity = Arc::new(LocalIdentityProvider::new(store.clone()));
        NewsService::new(cfg, store, identity, images)
    }

    fn sign_up(service: &NewsService, email: &str, admin: bool) -> Viewer {
        let session = service.register(email, "secret-pw").unwrap();
        if admin {
            service.users().set_admin(&session.user.uid, true).unwrap();
        }
        service.authenticate(&session.token).unwrap()
    }

    fn draft() -> ArticleDraft {
        ArticleDraft {
            title: "Title".into(),
            short_desc: "Short".into(),
            full_desc: "Intro [IMG:https://i.ibb.co/a.jpg] outro".into(),
            sources: "example.com, https://b.example".into(),
        }
    }

    #[test]
    fn test_publish_requires_admin() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let reader = sign_up(&service, "reader@example.com", false);

        let err = service
            .publish(&reader, "story", draft(), None)
            .unwrap_err();
        assert!(matches!(err, NewsError::PermissionDenied));
    }

    #[test]
    fn test_publish_lowercases_slug() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let admin = sign_up(&service, "admin@example.com", true);

        let article = service
            .publish(&admin, " AI-In-News ", draft(), None)
            .unwrap();
        assert_eq!(article.slug.as_str(), "ai-in-news");
        assert_eq!(article.author_id, admin.user.uid);
        assert_eq!(article.image_url, "");
    }

    #[test]
    fn test_publish_rejects_bad_slug() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let admin = sign_up(&service, "admin@example.com", true);

        let err = service
            .publish(&admin, "новость", draft(), None)
            .unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }

    #[test]
    fn test_publish_rejects_reserved_slugs() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let admin = sign_up(&service, "admin@example.com", true);

        for reserved in ["home", "Health", "api", "swagger-ui"] {
            let err = service
                .publish(&admin, reserved, draft(), None)
                .unwrap_err();
            assert!(
                matches!(err, NewsError::InvalidInput(_)),
                "{reserved} should be rejected"
            );
        }
        assert!(service.publish(&admin, "home-news", draft(), None).is_ok());
    }

    #[test]
    fn test_article_view_parses_body_and_sources() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let admin = sign_up(&service, "admin@example.com", true);
        service.publish(&admin, "story", draft(), None).unwrap();

        let view = service.article_view("story").unwrap();
        assert_eq!(
            view.segments,
            vec![
                ContentSegment::text("Intro "),
                ContentSegment::image("https://i.ibb.co/a.jpg"),
                ContentSegment::text(" outro"),
            ]
        );
        assert_eq!(
            view.sources,
            vec![
                SourceLink {
                    label: "example.com".into(),
                    href: "http://example.com".into()
                },
                SourceLink {
                    label: "https://b.example".into(),
                    href: "https://b.example".into()
                },
            ]
        );
        assert!(view.comments.is_empty());
    }

    #[test]
    fn test_article_view_missing_or_invalid_slug_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);

        assert!(matches!(
            service.article_view("missing"),
            Err(NewsError::NotFound(_))
        ));
        assert!(matches!(
            service.article_view("../etc"),
            Err(NewsError::NotFound(_))
        ));
    }

    #[test]
    fn test_readers_can_comment_and_admin_can_remove() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let admin = sign_up(&service, "admin@example.com", true);
        let reader = sign_up(&service, "reader@example.com", false);
        service.publish(&admin, "story", draft(), None).unwrap();

        let comment = service.add_comment(&reader, "story", "Nice").unwrap();
        assert_eq!(comment.user_email, "reader@example.com");
        assert_eq!(service.comments("story").unwrap(), vec![comment]);

        assert!(matches!(
            service.remove(&reader, "story"),
            Err(NewsError::PermissionDenied)
        ));
        service.remove(&admin, "story").unwrap();
        assert!(matches!(
            service.comments("story"),
            Err(NewsError::NotFound(_))
        ));
    }

    #[test]
    fn test_home_ticker_takes_latest_five() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = service(&temp_dir, None);
        let admin = sign_up(&service, "admin@example.com", true);
        for i in 0..7 {
            service
                .publish(&admin, &format!("story-{i}"), draft(), None)
                .unwrap();
        }

        let home = service.home().unwrap();
        assert_eq!(home.articles.len(), 7);
        assert_eq!(home.ticker.len(), TICKER_ITEMS);
        assert_eq!(home.ticker[0].slug, home.articles[0].slug);
    }

    #[tokio::test]
    async fn test_upload_image_requires_configured_host() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let without = service(&temp_dir, None);
        let admin = sign_up(&without, "admin@example.com", true);

        let err = without
            .upload_image(&admin, "a.png", vec![1, 2, 3])
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::ImageHostNotConfigured));

        let with = service(&temp_dir, Some(Arc::new(FixedImageHost)));
        let url = with.upload_image(&admin, "a.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(url, "https://images.example/a.png");
    }
}
