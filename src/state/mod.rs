//! State management module
//!
//! This module handles all exploration state, including:
//! - Shared data structures (data.rs)
//! - Compression parameter quantization and zones (params.rs)
//! - The session result cache (cache.rs)
//! - Displayable image handles and their lifecycle (display.rs)
//! - The exploration controller tying them together (explorer.rs)

pub mod cache;
pub mod data;
pub mod display;
pub mod explorer;
pub mod params;
