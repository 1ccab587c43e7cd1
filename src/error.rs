//! Error types shared by the exploration pipeline
//!
//! Every error here is `Clone` so it can ride along inside iced messages
//! and be kept around as the controller's `last_error`.

use thiserror::Error;

/// Errors surfaced by the exploration pipeline and its collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExploreError {
    /// The original image could not be fetched from the storage service
    #[error("{0}")]
    FetchOriginalFailed(String),

    /// The original image could not be decoded or re-encoded
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    /// The remote compression call failed (non-success status or transport)
    #[error("{0}")]
    CompressionRequestFailed(String),

    /// A compression parameter outside 1..=300 reached the controller
    #[error("Compression parameter {0} is outside 1..=300")]
    InvalidParameter(i64),

    /// The upload collaborator rejected the image or could not be reached
    #[error("{0}")]
    UploadFailed(String),
}

/// Fieldless discriminant of [`ExploreError`], exposed to the UI as `lastError`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FetchOriginalFailed,
    DecodeFailed,
    CompressionRequestFailed,
    InvalidParameter,
    UploadFailed,
}

impl ExploreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExploreError::FetchOriginalFailed(_) => ErrorKind::FetchOriginalFailed,
            ExploreError::DecodeFailed(_) => ErrorKind::DecodeFailed,
            ExploreError::CompressionRequestFailed(_) => ErrorKind::CompressionRequestFailed,
            ExploreError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            ExploreError::UploadFailed(_) => ErrorKind::UploadFailed,
        }
    }

    /// Blocking errors leave nothing to explore and replace the main view.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ExploreError::FetchOriginalFailed(_) | ExploreError::DecodeFailed(_)
        )
    }
}
