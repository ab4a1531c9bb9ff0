//! Article storage.
//!
//! Articles live in the `news` collection keyed by slug. The slug is chosen at publish time
//! and never changes; editing replaces the content fields only.

use crate::constants::NEWS_COLLECTION;
use crate::error::{NewsError, NewsResult};
use crate::models::{now_millis, Article, ArticleDraft};
use crate::repositories::comments::CommentRepository;
use crate::repositories::helpers::{decode_all, from_document, to_document};
use crate::store::DocumentStore;
use crate::validation::require_field;
use newsdesk_types::Slug;
use std::sync::Arc;

#[derive(Clone)]
pub struct ArticleRepository {
    store: Arc<dyn DocumentStore>,
}

impl ArticleRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Publishes a new article under `slug`.
    ///
    /// # Errors
    ///
    /// - `NewsError::InvalidInput` if title, short or full description is blank.
    /// - `NewsError::SlugTaken` if an article with this slug already exists.
    /// - Store errors on I/O failure.
    pub fn create(
        &self,
        slug: Slug,
        draft: ArticleDraft,
        image_url: String,
        author_id: &str,
    ) -> NewsResult<Article> {
        validate_draft(&draft)?;

        if self.get(&slug)?.is_some() {
            return Err(NewsError::SlugTaken(slug.to_string()));
        }

        let article = Article {
            slug,
            title: draft.title,
            short_desc: draft.short_desc,
            full_desc: draft.full_desc,
            sources: draft.sources,
            image_url,
            author_id: author_id.to_owned(),
            timestamp: now_millis(),
        };

        self.store
            .put(NEWS_COLLECTION, article.slug.as_str(), &to_document(&article)?)?;
        tracing::info!("published article '{}'", article.slug);
        Ok(article)
    }

    pub fn get(&self, slug: &Slug) -> NewsResult<Option<Article>> {
        self.store
            .get(NEWS_COLLECTION, slug.as_str())?
            .map(from_document::<Article>)
            .transpose()
    }

    /// Like [`get`](Self::get) but a missing article is an error.
    pub fn require(&self, slug: &Slug) -> NewsResult<Article> {
        self.get(slug)?
            .ok_or_else(|| NewsError::NotFound(format!("article '{}'", slug)))
    }

    /// Replaces the editable fields of an existing article.
    ///
    /// `new_image_url` replaces the cover image when `Some`; `None` keeps the current one.
    /// Slug, author and publish timestamp are preserved.
    pub fn update(
        &self,
        slug: &Slug,
        draft: ArticleDraft,
        new_image_url: Option<String>,
    ) -> NewsResult<Article> {
        validate_draft(&draft)?;

        let current = self.require(slug)?;
        let article = Article {
            title: draft.title,
            short_desc: draft.short_desc,
            full_desc: draft.full_desc,
            sources: draft.sources,
            image_url: new_image_url.unwrap_or(current.image_url),
            ..current
        };

        self.store
            .put(NEWS_COLLECTION, slug.as_str(), &to_document(&article)?)?;
        tracing::info!("updated article '{}'", slug);
        Ok(article)
    }

    /// Deletes an article together with its comments.
    pub fn delete(&self, slug: &Slug) -> NewsResult<()> {
        if !self.store.delete(NEWS_COLLECTION, slug.as_str())? {
            return Err(NewsError::NotFound(format!("article '{}'", slug)));
        }
        CommentRepository::new(self.store.clone()).delete_all_for(slug)?;
        tracing::info!("deleted article '{}'", slug);
        Ok(())
    }

    /// Newest articles first, at most `limit`.
    pub fn latest(&self, limit: usize) -> NewsResult<Vec<Article>> {
        let mut articles: Vec<Article> =
            decode_all(NEWS_COLLECTION, self.store.list(NEWS_COLLECTION)?);
        articles.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.slug.cmp(&b.slug))
        });
        articles.truncate(limit);
        Ok(articles)
    }
}

fn validate_draft(draft: &ArticleDraft) -> NewsResult<()> {
    require_field("title", &draft.title)?;
    require_field("short description", &draft.short_desc)?;
    require_field("full description", &draft.full_desc)
}
