//! Image hosting seam.
//!
//! Uploaded cover images and inline images are stored by a third-party host; the site only
//! keeps the returned URL.

use crate::config::{CoreConfig, ImgBbSettings};
use crate::error::{NewsError, NewsResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::sync::Arc;

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Stores the image and returns its public URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> NewsResult<String>;
}

/// Client for the ImgBB upload API.
pub struct ImgBbClient {
    client: Client,
    settings: ImgBbSettings,
}

impl ImgBbClient {
    pub fn new(settings: ImgBbSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl ImageHost for ImgBbClient {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> NewsResult<String> {
        if bytes.is_empty() {
            return Err(NewsError::InvalidInput("image file is empty".into()));
        }

        let form = Form::new().part("image", Part::bytes(bytes).file_name(file_name.to_owned()));

        let resp = self
            .client
            .post(&self.settings.upload_url)
            .query(&[("key", self.settings.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| NewsError::ImageUpload(e.to_string()))?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| NewsError::ImageUpload(e.to_string()))?;

        let url = parse_upload_response(&body)?;
        tracing::info!("uploaded image {} to {}", file_name, url);
        Ok(url)
    }
}

/// Extracts `data.url` from an ImgBB response, failing unless `success` is true.
pub fn parse_upload_response(body: &serde_json::Value) -> NewsResult<String> {
    if body["success"].as_bool() != Some(true) {
        let reason = body["error"]["message"]
            .as_str()
            .unwrap_or("image host reported failure");
        return Err(NewsError::ImageUpload(reason.to_string()));
    }

    body["data"]["url"]
        .as_str()
        .filter(|url| !url.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| NewsError::ImageUpload("response has no image url".into()))
}

/// Builds the configured image host, if uploads are enabled.
pub fn image_host_from_config(cfg: &CoreConfig) -> Option<Arc<dyn ImageHost>> {
    cfg.imgbb()
        .cloned()
        .map(|settings| Arc::new(ImgBbClient::new(settings)) as Arc<dyn ImageHost>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_parse_upload_response_success() {
        let body = json!({
            "success": true,
            "status": 200,
            "data": { "url": "https://i.ibb.co/abc/photo.jpg" }
        });
        assert_eq!(
            parse_upload_response(&body).unwrap(),
            "https://i.ibb.co/abc/photo.jpg"
        );
    }

    #[test]
    fn test_parse_upload_response_failure_carries_reason() {
        let body = json!({
            "success": false,
            "error": { "message": "Invalid API v1 key." }
        });
        let err = parse_upload_response(&body).unwrap_err();
        assert!(matches!(err, NewsError::ImageUpload(ref m) if m == "Invalid API v1 key."));
    }

    #[test]
    fn test_parse_upload_response_missing_url() {
        let body = json!({ "success": true, "data": {} });
        assert!(matches!(
            parse_upload_response(&body),
            Err(NewsError::ImageUpload(_))
        ));
    }

    #[test]
    fn test_image_host_disabled_without_settings() {
        let cfg = CoreConfig::new(PathBuf::from("data"), 20, None).unwrap();
        assert!(image_host_from_config(&cfg).is_none());
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let client = ImgBbClient::new(ImgBbSettings {
            api_key: "key".into(),
            upload_url: "http://127.0.0.1:9/upload".into(),
        });
        let err = client.upload("empty.png", Vec::new()).await.unwrap_err();
        assert!(matches!(err, NewsError::InvalidInput(_)));
    }
}
