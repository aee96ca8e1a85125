//! Object storage client used for profile pictures, ID documents and event photos.
//!
//! Speaks the Supabase-compatible storage REST API: objects are uploaded to
//! `{base}/storage/v1/object/{bucket}/{name}` and served publicly from
//! `{base}/storage/v1/object/public/{bucket}/{name}`.

use chrono::Utc;
use rand::Rng;
use reqwest::header::CONTENT_TYPE;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl StorageClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.storage_url.trim_end_matches('/').to_string(),
            api_key: config.storage_key.clone(),
            bucket: config.storage_bucket.clone(),
        }
    }

    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_name
        )
    }

    /// Uploads `bytes` under a fresh object name and returns its public URL.
    pub async fn upload(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> AppResult<String> {
        if self.base_url.is_empty() || self.api_key.is_empty() {
            return Err(AppError::Internal(
                "Object storage is not configured".to_string(),
            ));
        }

        let object_name = object_name(original_name);
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_name
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("x-upsert", "false")
            .header(
                CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, object = %object_name, "Storage rejected upload");
            return Err(AppError::Internal("Upload failed".to_string()));
        }

        tracing::info!(object = %object_name, bucket = %self.bucket, "File uploaded");
        Ok(self.public_url(&object_name))
    }
}

/// `{unix-millis}-{random}.{ext}`, keeping the extension of the uploaded file.
pub fn object_name(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let stamp = Utc::now().timestamp_millis();

    match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            format!("{}-{}.{}", stamp, suffix, ext.to_ascii_lowercase())
        }
        _ => format!("{}-{}", stamp, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_keeps_extension() {
        let name = object_name("Party Photo.JPG");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.matches('-').count(), 1);
    }

    #[test]
    fn object_name_without_extension() {
        assert!(!object_name("README").contains('.'));
        assert!(!object_name("weird.../x").contains('/'));
    }

    #[test]
    fn public_url_points_at_bucket() {
        let client = StorageClient {
            http: reqwest::Client::new(),
            base_url: "https://store.example".into(),
            api_key: "k".into(),
            bucket: "events".into(),
        };
        assert_eq!(
            client.public_url("1-2.png"),
            "https://store.example/storage/v1/object/public/events/1-2.png"
        );
    }
}
