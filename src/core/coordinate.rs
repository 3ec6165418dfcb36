//! Project coordinates.
//!
//! A coordinate is the identity of a descriptor in a repository:
//! `group:artifact:version`. Coordinates are plain strings with exact
//! equality. There is no normalization and no range matching; versions are
//! opaque labels to this engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A fully-specified `group:artifact:version` identity.
///
/// Used as the key for the descriptor cache and for repository lookups.
/// Two coordinates are equal only when all three components match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// Organizational namespace, e.g. `com.example.platform`.
    pub group: String,
    /// Name unique within the group.
    pub artifact: String,
    /// Opaque version label.
    pub version: String,
}

impl Coordinate {
    /// Create a coordinate from its three components.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// True if any component is empty or whitespace-only.
    #[must_use]
    pub fn has_blank_component(&self) -> bool {
        self.group.trim().is_empty()
            || self.artifact.trim().is_empty()
            || self.version.trim().is_empty()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// Error returned when parsing a `group:artifact:version` string fails.
#[derive(Debug, Error)]
#[error("invalid coordinate '{input}': expected group:artifact:version")]
pub struct ParseCoordinateError {
    /// The string that failed to parse.
    pub input: String,
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [group, artifact, version] = parts.as_slice() else {
            return Err(ParseCoordinateError {
                input: s.to_string(),
            });
        };

        let coordinate = Self::new(*group, *artifact, *version);
        if coordinate.has_blank_component() {
            return Err(ParseCoordinateError {
                input: s.to_string(),
            });
        }
        Ok(coordinate)
    }
}
