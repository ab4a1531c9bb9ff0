use newsdesk_types::{EmailError, SlugError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("authentication required")]
    Unauthenticated,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("permission denied")]
    PermissionDenied,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("an article with slug '{0}' already exists")]
    SlugTaken(String),
    #[error("an account with email '{0}' already exists")]
    EmailTaken(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete document: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize document: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error("image hosting is not configured")]
    ImageHostNotConfigured,
    #[error("image upload failed: {0}")]
    ImageUpload(String),
}

impl NewsError {
    /// True for failures caused by the environment rather than the caller.
    ///
    /// These are logged and shown to users only as a generic message.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            NewsError::StorageDirCreation(_)
                | NewsError::FileWrite(_)
                | NewsError::FileRead(_)
                | NewsError::FileDelete(_)
                | NewsError::Serialization(_)
                | NewsError::Deserialization(_)
                | NewsError::PasswordHash(_)
        )
    }
}

impl From<TextError> for NewsError {
    fn from(e: TextError) -> Self {
        NewsError::InvalidInput(e.to_string())
    }
}

impl From<SlugError> for NewsError {
    fn from(e: SlugError) -> Self {
        NewsError::InvalidInput(e.to_string())
    }
}

impl From<EmailError> for NewsError {
    fn from(e: EmailError) -> Self {
        NewsError::InvalidInput(e.to_string())
    }
}

pub type NewsResult<T> = std::result::Result<T, NewsError>;
