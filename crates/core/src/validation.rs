//! Input validation utilities.
//!
//! Checks applied to caller-supplied values before they reach storage or the identity
//! provider.

use crate::constants::MIN_PASSWORD_LEN;
use crate::{NewsError, NewsResult};
use newsdesk_types::NonEmptyText;

/// Validates that a collection path segment or document id is safe to use as a file name.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, which rules out path separators,
/// `..` and hidden files.
///
/// # Errors
///
/// Returns `NewsError::InvalidInput` if the segment is empty, too long or contains other
/// characters.
pub fn validate_path_segment(segment: &str) -> NewsResult<()> {
    const MAX_SEGMENT_LEN: usize = 128;

    if segment.is_empty() {
        return Err(NewsError::InvalidInput(
            "storage path segment cannot be empty".into(),
        ));
    }

    if segment.len() > MAX_SEGMENT_LEN {
        return Err(NewsError::InvalidInput(format!(
            "storage path segment exceeds maximum length of {} characters",
            MAX_SEGMENT_LEN
        )));
    }

    let ok = segment
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'));

    if !ok {
        return Err(NewsError::InvalidInput(format!(
            "storage path segment contains invalid characters: '{}'",
            segment
        )));
    }

    Ok(())
}

/// Validates every `/`-separated segment of a collection path.
pub fn validate_collection_path(collection: &str) -> NewsResult<()> {
    collection.split('/').try_for_each(validate_path_segment)
}

/// Validates a new account password.
pub fn validate_password(password: &str) -> NewsResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(NewsError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Validates that a required form field is not blank.
pub fn require_field(name: &str, value: &str) -> NewsResult<()> {
    NonEmptyText::new(value)
        .map(|_| ())
        .map_err(|_| NewsError::InvalidInput(format!("{} is required", name)))
}
