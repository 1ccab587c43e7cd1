//! Local validation and loading of images picked for upload
//!
//! Mirrors what the upload service accepts so obviously bad files never
//! leave the machine.

use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

/// Upload size limit applied when the config does not override it (5 MB)
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// File extensions the upload service accepts
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please select an image under {}MB", .limit / (1024 * 1024))]
    TooLarge { size: u64, limit: u64 },

    #[error("Please select an image file (PNG, JPG or GIF), got {0:?}")]
    UnsupportedType(String),

    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },
}

/// An image file that passed validation and is ready to be sent
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Bytes,
}

impl UploadFile {
    /// Read and validate the file at `path`.
    pub async fn read(path: impl AsRef<Path>, limit: u64) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let read_error = |e: std::io::Error| UploadError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let metadata = tokio::fs::metadata(path).await.map_err(read_error)?;
        let mime = validate(path, metadata.len(), limit)?;
        let bytes = tokio::fs::read(path).await.map_err(read_error)?;

        let file_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        tracing::info!("📁 Selected {} ({} bytes)", file_name, bytes.len());

        Ok(UploadFile {
            file_name,
            mime,
            bytes: Bytes::from(bytes),
        })
    }

    /// Size in megabytes, for display
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }
}

/// Check size and type, returning the MIME type to send with the file.
pub fn validate(path: &Path, size: u64, limit: u64) -> Result<&'static str, UploadError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mime = match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        _ => return Err(UploadError::UnsupportedType(extension)),
    };

    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }

    Ok(mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_accepts_allowed_extensions_case_insensitively() {
        assert_eq!(validate(Path::new("a.PNG"), 10, MAX_UPLOAD_BYTES), Ok("image/png"));
        assert_eq!(validate(Path::new("a.jpeg"), 10, MAX_UPLOAD_BYTES), Ok("image/jpeg"));
        assert_eq!(validate(Path::new("a.Jpg"), 10, MAX_UPLOAD_BYTES), Ok("image/jpeg"));
        assert_eq!(validate(Path::new("a.gif"), 10, MAX_UPLOAD_BYTES), Ok("image/gif"));
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(matches!(
            validate(Path::new("notes.txt"), 10, MAX_UPLOAD_BYTES),
            Err(UploadError::UnsupportedType(ext)) if ext == "txt"
        ));
        assert!(matches!(
            validate(Path::new("no_extension"), 10, MAX_UPLOAD_BYTES),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(validate(Path::new("a.png"), MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());

        let err = validate(Path::new("a.png"), MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).unwrap_err();
        assert_eq!(err.to_string(), "Please select an image under 5MB");
    }

    #[tokio::test]
    async fn test_read_loads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::File::create(&path).unwrap().write_all(b"not really a png").unwrap();

        let file = UploadFile::read(&path, MAX_UPLOAD_BYTES).await.unwrap();

        assert_eq!(file.file_name, "photo.png");
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.bytes.as_ref(), b"not really a png");
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        let result = UploadFile::read("/nonexistent/photo.png", MAX_UPLOAD_BYTES).await;
        assert!(matches!(result, Err(UploadError::Read { .. })));
    }
}
