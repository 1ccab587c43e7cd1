//! Grayscale conversion of the original image
//!
//! Every pixel's red, green and blue channels are replaced by their rounded
//! mean; alpha is carried over untouched and dimensions never change. The
//! result is re-encoded as PNG.

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Pixel};
use std::io::Cursor;

use crate::error::ExploreError;

/// Convert encoded image bytes to a grayscale PNG
///
/// Runs on a blocking thread because decoding and re-encoding are CPU-bound.
pub async fn to_grayscale_async(bytes: Bytes) -> Result<Bytes, ExploreError> {
    tokio::task::spawn_blocking(move || to_grayscale(&bytes))
        .await
        .map_err(|e| ExploreError::DecodeFailed(format!("Task join error: {}", e)))?
        .map(Bytes::from)
}

/// Blocking version of the grayscale conversion
///
/// # Errors
/// `DecodeFailed` when the bytes are not a supported image, the image has
/// no pixels, or the PNG encoder fails. A blank image is never returned.
pub fn to_grayscale(bytes: &[u8]) -> Result<Vec<u8>, ExploreError> {
    // Step 1: Decode into a pixel buffer
    let img = image::load_from_memory(bytes).map_err(|e| ExploreError::DecodeFailed(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(ExploreError::DecodeFailed("image has no pixels".into()));
    }

    // Step 2: Average the color channels, keeping alpha when there is one
    let gray = if img.color().has_alpha() {
        let mut rgba = img.to_rgba8();
        for pixel in rgba.pixels_mut() {
            let avg = channel_mean(pixel[0], pixel[1], pixel[2]);
            pixel.channels_mut()[..3].fill(avg);
        }
        DynamicImage::ImageRgba8(rgba)
    } else {
        let mut rgb = img.to_rgb8();
        for pixel in rgb.pixels_mut() {
            let avg = channel_mean(pixel[0], pixel[1], pixel[2]);
            pixel.channels_mut().fill(avg);
        }
        DynamicImage::ImageRgb8(rgb)
    };

    // Step 3: Re-encode for display
    let mut encoded = Cursor::new(Vec::new());
    gray.write_to(&mut encoded, ImageFormat::Png)
        .map_err(|e| ExploreError::DecodeFailed(format!("Failed to encode PNG: {}", e)))?;

    tracing::debug!(
        "🎨 Grayscale {}x{} ({} bytes)",
        gray.width(),
        gray.height(),
        encoded.get_ref().len()
    );

    Ok(encoded.into_inner())
}

/// `round((r + g + b) / 3)` in integer arithmetic
pub fn channel_mean(r: u8, g: u8, b: u8) -> u8 {
    ((r as u16 + g as u16 + b as u16 + 1) / 3) as u8
}
