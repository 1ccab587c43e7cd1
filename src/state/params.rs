//! Compression parameter handling
//!
//! The slider produces raw integers in 1..=300. Before a value is used as a
//! cache key it is quantized to a [`Quality`], so nearby slider positions
//! share one cache entry. [`Zone`] is the presentation-only bucket shown in
//! the legend and never influences caching or requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ExploreError;

/// Smallest value the slider can produce (kept verbatim by quantization)
pub const MIN_PARAMETER: u16 = 1;

/// Largest value the slider can produce
pub const MAX_PARAMETER: u16 = 300;

/// Quantization step for cache keys
pub const QUANTIZATION_STEP: u16 = 10;

/// Slider position used on open and by the Reset button
pub const DEFAULT_PARAMETER: u16 = 100;

/// A quantized compression parameter, usable as a cache key
///
/// Always one of `1, 10, 20, ..., 300`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Quality(u16);

impl Quality {
    /// Quantize a raw slider value into a cache key.
    ///
    /// Rounds `value / 10` half up (`15 -> 20`, `295 -> 300`). The boundary
    /// value 1 is preserved so the strongest compression stays reachable,
    /// and inputs that would round to 0 (`2..=4`) collapse onto it as well.
    ///
    /// # Errors
    /// `InvalidParameter` for anything outside 1..=300.
    pub fn quantize(value: i64) -> Result<Self, ExploreError> {
        if value < MIN_PARAMETER as i64 || value > MAX_PARAMETER as i64 {
            return Err(ExploreError::InvalidParameter(value));
        }

        let step = QUANTIZATION_STEP as i64;
        let rounded = (value + step / 2) / step * step;

        Ok(Quality(rounded.max(MIN_PARAMETER as i64) as u16))
    }

    /// Number of retained singular values sent to the backend
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(DEFAULT_PARAMETER)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qualitative compression zone for the legend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// 201-300: best quality, largest file size
    High,
    /// 101-200: good quality, moderate file size
    MediumHigh,
    /// 50-100: best balance of quality and compression
    Optimal,
    /// 21-49: more compression, noticeable quality loss
    MediumLow,
    /// 1-20: smallest file size, significant quality loss
    Low,
}

impl Zone {
    /// Zones in legend order, highest fidelity first
    pub const ALL: [Zone; 5] = [
        Zone::High,
        Zone::MediumHigh,
        Zone::Optimal,
        Zone::MediumLow,
        Zone::Low,
    ];

    /// Classify a raw slider value
    pub fn classify(value: u16) -> Zone {
        if value > 200 {
            Zone::High
        } else if value > 100 {
            Zone::MediumHigh
        } else if value >= 50 {
            Zone::Optimal
        } else if value > 20 {
            Zone::MediumLow
        } else {
            Zone::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Zone::High => "high",
            Zone::MediumHigh => "medium-high",
            Zone::Optimal => "optimal",
            Zone::MediumLow => "medium-low",
            Zone::Low => "low",
        }
    }

    /// Heading shown in the legend
    pub fn title(self) -> &'static str {
        match self {
            Zone::High => "High Quality (201-300)",
            Zone::MediumHigh => "Medium-High (101-200)",
            Zone::Optimal => "Optimal Range (50-100)",
            Zone::MediumLow => "Medium-Low (21-49)",
            Zone::Low => "High Compression (1-20)",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Zone::High => "Best quality, largest file size",
            Zone::MediumHigh => "Good quality, moderate file size",
            Zone::Optimal => "Best balance of quality and compression",
            Zone::MediumLow => "More compression, noticeable quality loss",
            Zone::Low => "Smallest file size, significant quality loss",
        }
    }
}
