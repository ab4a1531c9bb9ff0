//! Constants used throughout the newsdesk core crate.
//!
//! Collection names and defaults live here so storage layout stays consistent across the
//! repositories.

/// Default directory for document storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "news_data";

/// Collection holding one document per article, keyed by slug.
pub const NEWS_COLLECTION: &str = "news";

/// Parent collection for comments; each article gets `comments/<slug>/`.
pub const COMMENTS_COLLECTION: &str = "comments";

/// Collection holding user profiles, keyed by uid.
pub const USERS_COLLECTION: &str = "users";

/// Collection holding local identity credentials, keyed by email digest.
pub const CREDENTIALS_COLLECTION: &str = "credentials";

/// Number of articles shown on the home page unless configured otherwise.
pub const DEFAULT_HOME_LIMIT: usize = 20;

/// Number of latest articles shown in the headline ticker.
pub const TICKER_ITEMS: usize = 5;

/// Email shown on comments whose author has no email.
pub const ANONYMOUS_EMAIL: &str = "Anonymous";

/// Minimum accepted password length for local accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Slugs taken by fixed site routes; an article under one of these could never be reached.
pub const RESERVED_SLUGS: &[&str] = &["home", "health", "api", "api-docs", "swagger-ui"];

/// Hours a local session token stays valid after sign-in.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Default ImgBB upload endpoint.
pub const DEFAULT_IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";
