//! Session-scoped result cache
//!
//! Two-level map: image identifier -> quality -> compressed payload.
//! Entries are written once and never evicted; the whole cache lives as
//! long as the [`Explorer`](super::explorer::Explorer) that owns it.

use bytes::Bytes;
use std::collections::HashMap;
use std::future::Future;

use super::data::ImageId;
use super::params::Quality;

/// Compressed payloads keyed by (image, quality)
#[derive(Debug, Default)]
pub struct ResultCache {
    images: HashMap<ImageId, HashMap<Quality, Bytes>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously computed payload.
    pub fn get(&self, image: &ImageId, quality: Quality) -> Option<Bytes> {
        self.images.get(image)?.get(&quality).cloned()
    }

    pub fn contains(&self, image: &ImageId, quality: Quality) -> bool {
        self.images
            .get(image)
            .is_some_and(|entries| entries.contains_key(&quality))
    }

    /// Store a payload. A key that is already present keeps its first value.
    ///
    /// Returns `true` if a new entry was created.
    pub fn put(&mut self, image: ImageId, quality: Quality, payload: Bytes) -> bool {
        let entries = self.images.entry(image).or_default();
        if entries.contains_key(&quality) {
            return false;
        }
        entries.insert(quality, payload);
        true
    }

    /// Return the cached payload, or run `compute` and cache its result.
    ///
    /// A failed `compute` leaves no entry behind, so the next call for the
    /// same key tries again.
    pub async fn get_or_compute<F, Fut, E>(
        &mut self,
        image: &ImageId,
        quality: Quality,
        compute: F,
    ) -> Result<Bytes, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, E>>,
    {
        if let Some(hit) = self.get(image, quality) {
            return Ok(hit);
        }

        let payload = compute().await?;
        self.put(image.clone(), quality, payload.clone());
        Ok(payload)
    }

    /// Number of cached payloads across all images
    pub fn len(&self) -> usize {
        self.images.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached payloads for one image
    pub fn entries_for(&self, image: &ImageId) -> usize {
        self.images.get(image).map_or(0, HashMap::len)
    }
}
