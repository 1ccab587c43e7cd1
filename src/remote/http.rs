//! HTTP adapter for the image backend
//!
//! Endpoints:
//! - `POST /api/upload` (multipart, field `image`) -> `{"id": "..."}`
//! - `GET /api/image/{id}` -> original bytes
//! - `GET /api/compress/{id}?values=N` -> compressed PNG

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::RemoteService;
use crate::error::ExploreError;
use crate::state::data::ImageId;
use crate::state::params::Quality;
use crate::upload::UploadFile;

/// Body returned by a successful upload
#[derive(Debug, Deserialize)]
struct UploadResponse {
    id: Option<ImageId>,
}

/// Body returned by the backend on a rejected request
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<String>,
}

/// [`RemoteService`] backed by the HTTP API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("svd-explorer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpBackend {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

#[async_trait]
impl RemoteService for HttpBackend {
    async fn upload(&self, file: &UploadFile) -> Result<ImageId, ExploreError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(file.mime)
            .map_err(|e| ExploreError::UploadFailed(e.to_string()))?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Upload transport error: {}", e);
                ExploreError::UploadFailed("Failed to connect to server".into())
            })?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();

        if !status.is_success() {
            let detail = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(|body| body.detail);
            tracing::warn!("Upload rejected with {}: {:?}", status, detail);
            return Err(ExploreError::UploadFailed(
                detail.unwrap_or_else(|| "Failed to upload image".into()),
            ));
        }

        serde_json::from_slice::<UploadResponse>(&body)
            .ok()
            .and_then(|body| body.id)
            .ok_or_else(|| ExploreError::UploadFailed("Invalid response from server".into()))
    }

    async fn fetch_original(&self, image: &ImageId) -> Result<Bytes, ExploreError> {
        tracing::debug!("Fetching original image {}", image);

        let response = self
            .client
            .get(self.endpoint(&format!("image/{}", image.as_str())))
            .send()
            .await
            .map_err(|e| ExploreError::FetchOriginalFailed(format!("Failed to load image: {}", e)))?;

        check_status(response.status(), "Failed to load image")
            .map_err(ExploreError::FetchOriginalFailed)?;

        response
            .bytes()
            .await
            .map_err(|e| ExploreError::FetchOriginalFailed(format!("Failed to load image: {}", e)))
    }

    async fn compress(&self, image: &ImageId, quality: Quality) -> Result<Bytes, ExploreError> {
        tracing::debug!("Compressing image {} with {} values", image, quality);

        let response = self
            .client
            .get(self.endpoint(&format!("compress/{}", image.as_str())))
            .query(&[("values", quality.get())])
            .send()
            .await
            .map_err(|e| {
                ExploreError::CompressionRequestFailed(format!("Failed to compress image: {}", e))
            })?;

        check_status(response.status(), "Failed to compress image")
            .map_err(ExploreError::CompressionRequestFailed)?;

        response.bytes().await.map_err(|e| {
            ExploreError::CompressionRequestFailed(format!("Failed to compress image: {}", e))
        })
    }
}

fn check_status(status: StatusCode, context: &str) -> Result<(), String> {
    if status.is_success() {
        Ok(())
    } else {
        Err(format!("{}: {}", context, status))
    }
}
