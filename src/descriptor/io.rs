//! I/O operations for descriptor files.
//!
//! Reading distinguishes two failure modes that callers handle differently:
//! a file that cannot be read ([`StrataError::DescriptorRead`]) and a file
//! that reads fine but is not a valid descriptor
//! ([`StrataError::DescriptorParse`]). Parent lookup relies on the
//! distinction to report a missing ancestor as "not found" while still
//! failing loudly on a corrupt one.
//!
//! Raw descriptors are deliberately NOT validated here. Validation runs on
//! the finished model, after inheritance and interpolation, so that a field
//! missing from one file but supplied by an ancestor is not an error.

use crate::core::error::StrataError;
use crate::descriptor::Descriptor;
use std::path::Path;

impl Descriptor {
    /// Load and parse a descriptor from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::DescriptorRead`] when the file is missing or
    /// unreadable, and [`StrataError::DescriptorParse`] when its contents do
    /// not deserialize into the descriptor schema.
    pub fn load(path: &Path) -> Result<Self, StrataError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StrataError::DescriptorRead {
                path: path.display().to_string(),
                reason: describe_io_error(&e),
            })?;

        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Parse a descriptor from TOML text.
    ///
    /// `origin` names the source in errors: a file path, or a label such as
    /// `com.example:parent:1.0 (central)` for content fetched from a
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::DescriptorParse`] with the TOML error message
    /// when the content is not a valid descriptor.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, StrataError> {
        toml::from_str(content).map_err(|e| StrataError::DescriptorParse {
            file: origin.to_string(),
            reason: e.to_string(),
        })
    }

    /// Serialize the descriptor to TOML.
    pub fn to_toml_string(&self) -> Result<String, StrataError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize the descriptor to JSON.
    pub fn to_json_string(&self) -> Result<String, StrataError> {
        serde_json::to_string_pretty(self).map_err(|e| StrataError::Other {
            message: format!("cannot serialize descriptor to JSON: {e}"),
        })
    }
}

/// Map an IO error to a short human reason.
///
/// `NotFound` and `PermissionDenied` get stable wording so callers and tests
/// can tell a missing descriptor from an unreadable one.
fn describe_io_error(error: &std::io::Error) -> String {
    match error.kind() {
        std::io::ErrorKind::NotFound => "file not found".to_string(),
        std::io::ErrorKind::PermissionDenied => "permission denied".to_string(),
        _ => error.to_string(),
    }
}
