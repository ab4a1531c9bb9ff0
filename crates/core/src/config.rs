//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Request handlers never read process-wide environment variables.

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_HOME_LIMIT, DEFAULT_IMGBB_UPLOAD_URL};
use crate::{NewsError, NewsResult};
use std::path::{Path, PathBuf};

/// Credentials for the ImgBB upload API.
#[derive(Clone, Debug)]
pub struct ImgBbSettings {
    pub api_key: String,
    pub upload_url: String,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    home_limit: usize,
    imgbb: Option<ImgBbSettings>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `NewsError::InvalidInput` if `home_limit` is zero.
    pub fn new(
        data_dir: PathBuf,
        home_limit: usize,
        imgbb: Option<ImgBbSettings>,
    ) -> NewsResult<Self> {
        if home_limit == 0 {
            return Err(NewsError::InvalidInput(
                "home_limit must be at least 1".into(),
            ));
        }

        Ok(Self {
            data_dir,
            home_limit,
            imgbb,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn home_limit(&self) -> usize {
        self.home_limit
    }

    pub fn imgbb(&self) -> Option<&ImgBbSettings> {
        self.imgbb.as_ref()
    }
}

/// Resolve the document store root, creating it when missing.
///
/// `override_dir` is the raw value of `NEWSDESK_DATA_DIR`, if set.
pub fn resolve_data_dir(override_dir: Option<String>) -> NewsResult<PathBuf> {
    let dir = override_dir
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    if dir.exists() && !dir.is_dir() {
        return Err(NewsError::InvalidInput(format!(
            "data directory path is not a directory: {}",
            dir.display()
        )));
    }

    std::fs::create_dir_all(&dir).map_err(NewsError::StorageDirCreation)?;
    Ok(dir)
}

/// Parse the home page article limit from an optional string value.
///
/// `None` or blank yields the default.
pub fn home_limit_from_env_value(value: Option<String>) -> NewsResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_HOME_LIMIT),
        Some(v) => v.parse::<usize>().map_err(|e| {
            NewsError::InvalidInput(format!("NEWSDESK_HOME_LIMIT must be a number: {}", e))
        }),
    }
}

/// Build ImgBB settings from optional environment values.
///
/// Uploads stay disabled when no API key is given.
pub fn imgbb_from_env_values(
    api_key: Option<String>,
    upload_url: Option<String>,
) -> Option<ImgBbSettings> {
    let api_key = api_key
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())?;
    let upload_url = upload_url
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_IMGBB_UPLOAD_URL.to_string());

    Some(ImgBbSettings {
        api_key,
        upload_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_home_limit_defaults_when_missing_or_blank() {
        assert_eq!(home_limit_from_env_value(None).unwrap(), DEFAULT_HOME_LIMIT);
        assert_eq!(
            home_limit_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_HOME_LIMIT
        );
        assert_eq!(home_limit_from_env_value(Some("7".into())).unwrap(), 7);
    }

    #[test]
    fn test_home_limit_rejects_garbage() {
        let err = home_limit_from_env_value(Some("lots".into())).unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }

    #[test]
    fn test_core_config_rejects_zero_limit() {
        let err = CoreConfig::new(PathBuf::from("x"), 0, None).unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }

    #[test]
    fn test_imgbb_requires_api_key() {
        assert!(imgbb_from_env_values(None, None).is_none());
        assert!(imgbb_from_env_values(Some(" ".into()), None).is_none());

        let settings = imgbb_from_env_values(Some("key".into()), None).unwrap();
        assert_eq!(settings.api_key, "key");
        assert_eq!(settings.upload_url, DEFAULT_IMGBB_UPLOAD_URL);
    }

    #[test]
    fn test_resolve_data_dir_creates_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let target = temp_dir.path().join("nested").join("data");

        let resolved =
            resolve_data_dir(Some(target.display().to_string())).expect("should resolve");

        assert_eq!(resolved, target);
        assert!(target.is_dir());
    }

    #[test]
    fn test_resolve_data_dir_rejects_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let err = resolve_data_dir(Some(file.display().to_string())).unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }
}
