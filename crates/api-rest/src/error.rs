use axum::http::StatusCode;
use newsdesk_core::NewsError;

pub type ApiError = (StatusCode, &'static str);

/// Maps a core error to a status and a fixed message.
///
/// Transient failures are logged with their cause and reported as a bare 500.
pub fn api_error(context: &str, err: NewsError) -> ApiError {
    if err.is_transient() {
        tracing::error!("{} error: {:?}", context, err);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error");
    }

    tracing::debug!("{} rejected: {}", context, err);
    match err {
        NewsError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        NewsError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
        NewsError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid email or password"),
        NewsError::PermissionDenied => (StatusCode::FORBIDDEN, "Permission denied"),
        NewsError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
        NewsError::SlugTaken(_) => (StatusCode::CONFLICT, "Slug already taken"),
        NewsError::EmailTaken(_) => (StatusCode::CONFLICT, "Email already registered"),
        NewsError::ImageUpload(_) => (StatusCode::BAD_GATEWAY, "Image upload failed"),
        NewsError::ImageHostNotConfigured => {
            (StatusCode::SERVICE_UNAVAILABLE, "Image uploads are not configured")
        }
        other => {
            tracing::error!("{} error: {:?}", context, other);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_keep_their_status() {
        assert_eq!(
            api_error("t", NewsError::InvalidInput("x".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            api_error("t", NewsError::Unauthenticated).0,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            api_error("t", NewsError::PermissionDenied).0,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            api_error("t", NewsError::SlugTaken("a".into())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            api_error("t", NewsError::ImageHostNotConfigured).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_transient_errors_hide_detail() {
        let err = NewsError::FileRead(std::io::Error::other("disk gone"));
        assert_eq!(
            api_error("t", err),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        );
    }
}
