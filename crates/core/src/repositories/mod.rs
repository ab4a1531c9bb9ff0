//! Repository modules.
//!
//! Typed access to the document store for articles, comments and user profiles.

pub mod articles;
pub mod comments;
pub(crate) mod helpers;
pub mod users;
