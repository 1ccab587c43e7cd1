//! Local image processing
//!
//! This module handles:
//! - Decoding the original image fetched from the storage service
//! - Converting it to grayscale by channel averaging
//! - Re-encoding the result as PNG for display

pub mod grayscale;
