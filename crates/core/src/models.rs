//! Persisted record shapes.
//!
//! Field names serialise in camelCase to match the documents already stored by the site.

use chrono::{DateTime, TimeZone, Utc};
use newsdesk_types::Slug;
use serde::{Deserialize, Serialize};

/// A published news article. `slug` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: Slug,
    pub title: String,
    pub short_desc: String,
    /// Body text with inline `[IMG:<url>]` markers.
    pub full_desc: String,
    /// Raw comma/newline separated source list.
    #[serde(default)]
    pub sources: String,
    /// Cover image URL, empty when the article has none.
    #[serde(default)]
    pub image_url: String,
    pub author_id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// Editable fields of an article, as submitted by the publishing form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub short_desc: String,
    pub full_desc: String,
    pub sources: String,
}

/// A reader comment, stored under its article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    /// Slug of the article the comment belongs to.
    pub news_id: String,
    pub user_id: String,
    pub user_email: String,
    pub text: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn datetime_from_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Human-readable timestamp for pages, e.g. `18.10.2026 14:05`.
pub fn format_millis(millis: i64) -> String {
    datetime_from_millis(millis)
        .map(|dt| dt.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_default()
}
