//! Shared data structures for the application state
//!
//! These types flow between the remote collaborators, the exploration
//! controller and the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the upload service assigns to one uploaded source image
///
/// Opaque to the client; it is only ever echoed back to the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        ImageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        ImageId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_from_plain_string() {
        let id: ImageId = serde_json::from_str("\"img123\"").unwrap();
        assert_eq!(id, ImageId::from("img123"));
        assert_eq!(id.to_string(), "img123");
    }
}
