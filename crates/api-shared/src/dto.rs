//! Request and response bodies for the JSON API.
//!
//! Field names are camelCase on the wire, matching the stored documents.

use newsdesk_core::models::format_millis;
use newsdesk_core::{
    Article, ArticleDraft, ArticleView, Comment, ContentSegment, Session, SourceLink, UserProfile,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One piece of a rendered article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SegmentRes {
    Text { text: String },
    Image { url: String },
}

impl From<ContentSegment> for SegmentRes {
    fn from(segment: ContentSegment) -> Self {
        match segment {
            ContentSegment::Text { text } => Self::Text { text },
            ContentSegment::Image { url } => Self::Image { url },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SourceLinkRes {
    pub label: String,
    pub href: String,
}

impl From<SourceLink> for SourceLinkRes {
    fn from(link: SourceLink) -> Self {
        Self {
            label: link.label,
            href: link.href,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummaryRes {
    pub slug: String,
    pub title: String,
    pub short_desc: String,
    pub image_url: String,
    pub timestamp: i64,
    /// `dd.MM.yyyy HH:mm` in UTC.
    pub published_at: String,
}

impl From<Article> for ArticleSummaryRes {
    fn from(article: Article) -> Self {
        Self {
            published_at: format_millis(article.timestamp),
            slug: article.slug.to_string(),
            title: article.title,
            short_desc: article.short_desc,
            image_url: article.image_url,
            timestamp: article.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListArticlesRes {
    pub articles: Vec<ArticleSummaryRes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRes {
    pub slug: String,
    pub title: String,
    pub short_desc: String,
    pub full_desc: String,
    pub sources: String,
    pub image_url: String,
    pub author_id: String,
    pub timestamp: i64,
    pub published_at: String,
    /// `fullDesc` split into text and image segments.
    pub segments: Vec<SegmentRes>,
    pub source_links: Vec<SourceLinkRes>,
}

impl From<ArticleView> for ArticleRes {
    fn from(view: ArticleView) -> Self {
        let article = view.article;
        Self {
            published_at: format_millis(article.timestamp),
            slug: article.slug.to_string(),
            title: article.title,
            short_desc: article.short_desc,
            full_desc: article.full_desc,
            sources: article.sources,
            image_url: article.image_url,
            author_id: article.author_id,
            timestamp: article.timestamp,
            segments: view.segments.into_iter().map(SegmentRes::from).collect(),
            source_links: view.sources.into_iter().map(SourceLinkRes::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleReq {
    /// Lower-cased before validation; letters, digits and `-` only.
    pub slug: String,
    pub title: String,
    pub short_desc: String,
    pub full_desc: String,
    #[serde(default)]
    pub sources: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl CreateArticleReq {
    pub fn into_parts(self) -> (String, ArticleDraft, Option<String>) {
        let draft = ArticleDraft {
            title: self.title,
            short_desc: self.short_desc,
            full_desc: self.full_desc,
            sources: self.sources,
        };
        (self.slug, draft, self.image_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleReq {
    pub title: String,
    pub short_desc: String,
    pub full_desc: String,
    #[serde(default)]
    pub sources: String,
    /// Replaces the cover image when present.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UpdateArticleReq {
    pub fn into_parts(self) -> (ArticleDraft, Option<String>) {
        let draft = ArticleDraft {
            title: self.title,
            short_desc: self.short_desc,
            full_desc: self.full_desc,
            sources: self.sources,
        };
        (draft, self.image_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentReq {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRes {
    pub id: String,
    pub news_id: String,
    pub user_id: String,
    pub user_email: String,
    pub text: String,
    pub timestamp: i64,
    pub posted_at: String,
}

impl From<Comment> for CommentRes {
    fn from(comment: Comment) -> Self {
        Self {
            posted_at: format_millis(comment.timestamp),
            id: comment.id,
            news_id: comment.news_id,
            user_id: comment.user_id,
            user_email: comment.user_email,
            text: comment.text,
            timestamp: comment.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListCommentsRes {
    pub comments: Vec<CommentRes>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthReq {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionRes {
    pub token: String,
    pub uid: String,
    pub email: String,
}

impl From<Session> for SessionRes {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            uid: session.user.uid,
            email: session.user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRes {
    pub uid: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<UserProfile> for ProfileRes {
    fn from(profile: UserProfile) -> Self {
        Self {
            uid: profile.uid,
            email: profile.email,
            is_admin: profile.is_admin,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    pub url: String,
}
