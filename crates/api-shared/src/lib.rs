//! # API Shared
//!
//! Shared utilities and definitions for the newsdesk API.
//!
//! Contains:
//! - Request and response types (`dto` module)
//! - Shared services like `HealthService`
//! - Bearer token extraction
//!
//! Used by `api-rest` and the workspace runner.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
