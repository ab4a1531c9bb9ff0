//! # Newsdesk Core
//!
//! Core logic for the newsdesk site.
//!
//! This crate contains the data operations behind every page and endpoint:
//! - Inline content parsing and rendering (`[IMG:<url>]` markers in article bodies)
//! - Article, comment and user profile storage as JSON documents under `NEWSDESK_DATA_DIR`
//! - Email/password identity with admin gating
//! - Image upload to an external host
//!
//! **No API concerns**: HTTP routing, request parsing and response formatting belong in
//! `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod content;
pub mod error;
pub mod identity;
pub mod images;
pub mod models;
pub mod repositories;
pub mod service;
pub mod sources;
pub mod store;
pub mod validation;

pub use config::{CoreConfig, ImgBbSettings};
pub use content::{parse_content, render_html, to_markup, ContentSegment};
pub use error::{NewsError, NewsResult};
pub use identity::{IdentityProvider, IdentityUser, LocalIdentityProvider, Session};
pub use images::{image_host_from_config, ImageHost, ImgBbClient};
pub use models::{Article, ArticleDraft, Comment, UserProfile};
pub use service::{ArticleView, HomeView, NewsService, SourceLink, TickerItem, Viewer};
pub use store::{DocumentStore, FileDocumentStore};

pub use newsdesk_types::{EmailAddress, NonEmptyText, Slug};
