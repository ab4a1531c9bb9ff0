use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;

/// Extracts the session token from an `Authorization: Bearer <token>` header.
///
/// Returns `None` if the header is missing, not valid UTF-8, uses another scheme or carries
/// an empty token. The scheme name is matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
