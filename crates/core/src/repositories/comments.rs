//! Reader comments.
//!
//! Comments for an article live in their own collection, `comments/<slug>/`, so deleting an
//! article can drop them in one go.

use crate::constants::{ANONYMOUS_EMAIL, COMMENTS_COLLECTION, NEWS_COLLECTION};
use crate::error::{NewsError, NewsResult};
use crate::models::{now_millis, Comment};
use crate::repositories::helpers::{allocate_document_id, decode_all, new_id, to_document};
use crate::store::DocumentStore;
use crate::validation::require_field;
use newsdesk_types::Slug;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommentRepository {
    store: Arc<dyn DocumentStore>,
}

fn collection_for(slug: &Slug) -> String {
    format!("{}/{}", COMMENTS_COLLECTION, slug)
}

impl CommentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Adds a comment to an existing article.
    ///
    /// The text is stored as typed. An empty `user_email` is recorded as `Anonymous`.
    ///
    /// # Errors
    ///
    /// - `NewsError::InvalidInput` if the text is blank.
    /// - `NewsError::NotFound` if the article does not exist.
    pub fn add(
        &self,
        slug: &Slug,
        user_id: &str,
        user_email: &str,
        text: &str,
    ) -> NewsResult<Comment> {
        require_field("comment text", text)?;

        if self.store.get(NEWS_COLLECTION, slug.as_str())?.is_none() {
            return Err(NewsError::NotFound(format!("article '{}'", slug)));
        }

        let collection = collection_for(slug);
        let id = allocate_document_id(self.store.as_ref(), &collection, new_id)?;

        let user_email = if user_email.trim().is_empty() {
            ANONYMOUS_EMAIL.to_owned()
        } else {
            user_email.to_owned()
        };

        let comment = Comment {
            id,
            news_id: slug.to_string(),
            user_id: user_id.to_owned(),
            user_email,
            text: text.to_owned(),
            timestamp: now_millis(),
        };

        self.store
            .put(&collection, &comment.id, &to_document(&comment)?)?;
        tracing::debug!("comment {} added to '{}'", comment.id, slug);
        Ok(comment)
    }

    /// Comments on an article, newest first.
    pub fn list_for(&self, slug: &Slug) -> NewsResult<Vec<Comment>> {
        let collection = collection_for(slug);
        let mut comments: Vec<Comment> = decode_all(&collection, self.store.list(&collection)?);
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }

    pub fn delete_all_for(&self, slug: &Slug) -> NewsResult<()> {
        self.store.delete_collection(&collection_for(slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FileDocumentStore;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup(temp_dir: &TempDir) -> (Arc<dyn DocumentStore>, CommentRepository, Slug) {
        let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(temp_dir.path()));
        store
            .put(NEWS_COLLECTION, "story", &json!({"slug": "story"}))
            .unwrap();
        (
            store.clone(),
            CommentRepository::new(store),
            Slug::parse("story").unwrap(),
        )
    }

    #[test]
    fn test_add_and_list() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, comments, slug) = setup(&temp_dir);

        let added = comments
            .add(&slug, "uid-1", "reader@example.com", "Great read\nthanks")
            .expect("add should succeed");

        assert_eq!(added.news_id, "story");
        assert_eq!(added.user_email, "reader@example.com");
        assert_eq!(added.text, "Great read\nthanks");

        assert_eq!(comments.list_for(&slug).unwrap(), vec![added]);
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, comments, slug) = setup(&temp_dir);

        let err = comments.add(&slug, "u", "e@x.com", " \n ").unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
        assert!(comments.list_for(&slug).unwrap().is_empty());
    }

    #[test]
    fn test_add_to_missing_article_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, comments, _) = setup(&temp_dir);

        let err = comments
            .add(&Slug::parse("ghost").unwrap(), "u", "e@x.com", "hi")
            .unwrap_err();
        assert!(matches!(err, NewsError::NotFound(_)));
    }

    #[test]
    fn test_blank_email_becomes_anonymous() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, comments, slug) = setup(&temp_dir);

        let added = comments.add(&slug, "u", "", "hi").unwrap();
        assert_eq!(added.user_email, ANONYMOUS_EMAIL);
    }

    #[test]
    fn test_list_is_newest_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (store, comments, slug) = setup(&temp_dir);

        for (id, ts) in [("a", 10), ("b", 30), ("c", 20)] {
            store
                .put(
                    "comments/story",
                    id,
                    &json!({
                        "id": id,
                        "newsId": "story",
                        "userId": "u",
                        "userEmail": "e@x.com",
                        "text": id,
                        "timestamp": ts
                    }),
                )
                .unwrap();
        }

        let ids: Vec<String> = comments
            .list_for(&slug)
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_delete_all_for() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, comments, slug) = setup(&temp_dir);

        comments.add(&slug, "u", "e@x.com", "one").unwrap();
        comments.add(&slug, "u", "e@x.com", "two").unwrap();
        comments.delete_all_for(&slug).unwrap();

        assert!(comments.list_for(&slug).unwrap().is_empty());
    }
}
