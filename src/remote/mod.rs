//! Remote collaborators
//!
//! The upload/storage service and the compression service are reached over
//! HTTP. Everything above this module talks to them through
//! [`RemoteService`] so the controller can be driven by a fake in tests.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ExploreError;
use crate::state::data::ImageId;
use crate::state::params::Quality;
use crate::upload::UploadFile;

pub use http::HttpBackend;

/// Port for the upload, image-storage and compression collaborators
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Upload an image and return the identifier assigned to it.
    async fn upload(&self, file: &UploadFile) -> Result<ImageId, ExploreError>;

    /// Fetch the original bytes of an uploaded image.
    async fn fetch_original(&self, image: &ImageId) -> Result<Bytes, ExploreError>;

    /// Run the remote compression for `image` at `quality`.
    async fn compress(&self, image: &ImageId, quality: Quality) -> Result<Bytes, ExploreError>;
}

#[cfg(test)]
pub mod fake {
    //! In-memory stand-in for the backend

    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves fixed payloads and counts compression calls per quality
    #[derive(Debug, Default)]
    pub struct FakeBackend {
        pub assigned_id: String,
        pub original: Option<Bytes>,
        pub payloads: HashMap<u16, Bytes>,
        pub compress_calls: AtomicUsize,
        pub calls_by_quality: Mutex<Vec<u16>>,
    }

    impl FakeBackend {
        pub fn new(assigned_id: &str, original: Bytes) -> Self {
            FakeBackend {
                assigned_id: assigned_id.to_string(),
                original: Some(original),
                ..Default::default()
            }
        }

        pub fn with_payload(mut self, quality: u16, payload: &'static [u8]) -> Self {
            self.payloads.insert(quality, Bytes::from_static(payload));
            self
        }

        pub fn compress_calls(&self) -> usize {
            self.compress_calls.load(Ordering::SeqCst)
        }

        pub fn requested(&self) -> Vec<u16> {
            self.calls_by_quality.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteService for FakeBackend {
        async fn upload(&self, _file: &UploadFile) -> Result<ImageId, ExploreError> {
            Ok(ImageId::new(self.assigned_id.clone()))
        }

        async fn fetch_original(&self, _image: &ImageId) -> Result<Bytes, ExploreError> {
            self.original
                .clone()
                .ok_or_else(|| ExploreError::FetchOriginalFailed("Failed to load image: 404 Not Found".into()))
        }

        async fn compress(&self, _image: &ImageId, quality: Quality) -> Result<Bytes, ExploreError> {
            self.compress_calls.fetch_add(1, Ordering::SeqCst);
            self.calls_by_quality.lock().unwrap().push(quality.get());
            self.payloads.get(&quality.get()).cloned().ok_or_else(|| {
                ExploreError::CompressionRequestFailed(
                    "Failed to compress image: 500 Internal Server Error".into(),
                )
            })
        }
    }
}
