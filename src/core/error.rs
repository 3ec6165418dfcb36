//! Error handling for strata.
//!
//! This module provides the error types and user-friendly error reporting for
//! the descriptor resolution engine. The error system is designed around two
//! core principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`StrataError`] - enumerated error types for all failure cases
//! - [`ErrorContext`] - wrapper that adds user-friendly messages and suggestions
//!
//! # Error Categories
//!
//! Errors are organized by where they arise in a build:
//! - **Descriptor reading**: [`StrataError::DescriptorRead`],
//!   [`StrataError::DescriptorParse`]
//! - **Lineage assembly**: [`StrataError::MissingParentCoordinate`],
//!   [`StrataError::ParentNotFound`], [`StrataError::CyclicParentChain`]
//! - **Finishing**: [`StrataError::Interpolation`], [`StrataError::Validation`]
//! - **Artifacts**: [`StrataError::ArtifactNotFound`],
//!   [`StrataError::DependencyResolution`], [`StrataError::CircularDependency`],
//!   [`StrataError::ChecksumMismatch`]
//! - **Environment**: [`StrataError::SettingsLoad`], [`StrataError::StoreLock`],
//!   [`StrataError::Network`]
//!
//! Common standard library errors are converted automatically:
//! [`std::io::Error`] becomes [`StrataError::IoError`] and [`toml::de::Error`]
//! becomes [`StrataError::TomlError`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use strata::core::{StrataError, user_friendly_error};
//!
//! fn build_something() -> Result<(), StrataError> {
//!     Err(StrataError::MissingParentCoordinate {
//!         field: "version".to_string(),
//!         descriptor: "strata.toml".to_string(),
//!     })
//! }
//!
//! if let Err(e) = build_something() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // colored error with suggestions on stderr
//! }
//! ```

use crate::descriptor::validation::ValidationReport;
use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for descriptor resolution.
///
/// Each variant represents a specific failure mode with the details a caller
/// needs to react: paths, coordinates, and the reason the step failed.
/// Public builder entry points wrap these in [`anyhow::Error`] with an
/// umbrella context naming the project being built; callers can downcast to
/// recover the typed variant.
#[derive(Error, Debug)]
pub enum StrataError {
    /// A descriptor file could not be read from disk.
    ///
    /// Covers both a missing file and an unreadable one; the `reason`
    /// distinguishes them.
    #[error("cannot read descriptor at {path}: {reason}")]
    DescriptorRead {
        /// Path to the descriptor that failed to load.
        path: String,
        /// Why the read failed (not found, permission denied, ...).
        reason: String,
    },

    /// A descriptor file exists but is not valid TOML for the schema.
    #[error("invalid descriptor syntax in {file}")]
    DescriptorParse {
        /// Path to the descriptor that failed to parse.
        file: String,
        /// Specific reason for the parsing failure.
        reason: String,
    },

    /// A `[parent]` section is present but one of its coordinate fields is
    /// blank.
    ///
    /// Raised before any lookup is attempted, so an incomplete reference is
    /// never confused with a reference to a parent that does not exist.
    #[error("parent reference in {descriptor} is missing its '{field}' field")]
    MissingParentCoordinate {
        /// Which of group, artifact, or version was blank.
        field: String,
        /// The descriptor carrying the incomplete reference.
        descriptor: String,
    },

    /// A complete parent coordinate could not be located in the store or any
    /// accumulated repository.
    #[error("parent descriptor {coordinate} not found")]
    ParentNotFound {
        /// The coordinate that could not be located.
        coordinate: String,
        /// The lookup failure that caused this.
        #[source]
        source: Box<StrataError>,
    },

    /// A parent chain revisited a coordinate already followed in this walk.
    #[error("cyclic parent chain detected: {chain}")]
    CyclicParentChain {
        /// The chain of coordinates, rendered `g:a:v -> g:a:v -> ...`.
        chain: String,
    },

    /// A `${...}` expression could not be resolved.
    ///
    /// Raised for unknown references and for reference chains deeper than
    /// the nesting limit (which is how self-referential properties surface).
    #[error("cannot interpolate expression '${{{expression}}}': {reason}")]
    Interpolation {
        /// The expression inside `${...}` that failed.
        expression: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The resolved model violated one or more structural rules.
    ///
    /// Carries the full report; every violation is collected before the
    /// build fails, never just the first.
    #[error("{0}")]
    Validation(ValidationReport),

    /// Transitive dependency resolution failed for a project.
    #[error("cannot resolve dependencies of {project}: {reason}")]
    DependencyResolution {
        /// Coordinate of the project whose dependencies failed to resolve.
        project: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A dependency cycle was detected in the artifact graph.
    #[error("circular dependency detected: {chain}")]
    CircularDependency {
        /// String representation of the dependency cycle.
        chain: String,
    },

    /// An artifact's descriptor was not present in the store or any
    /// configured repository.
    #[error("artifact {coordinate} not found in any repository")]
    ArtifactNotFound {
        /// The coordinate that could not be located.
        coordinate: String,
        /// The repositories that were searched, in order.
        repositories: Vec<String>,
    },

    /// A fetched file did not match its published checksum.
    #[error("checksum mismatch for {coordinate}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Coordinate of the artifact that failed verification.
        coordinate: String,
        /// The checksum the repository published.
        expected: String,
        /// The checksum computed from the fetched bytes.
        actual: String,
    },

    /// The settings file exists but could not be read or parsed.
    ///
    /// A missing settings file is not an error; the defaults apply.
    #[error("cannot load settings from {path}")]
    SettingsLoad {
        /// Path to the settings file.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The store's advisory lock could not be acquired.
    #[error("cannot lock store at {path}: {reason}")]
    StoreLock {
        /// The store directory being locked.
        path: String,
        /// Why acquisition failed.
        reason: String,
    },

    /// A remote repository operation failed.
    #[error("network error while {operation}")]
    Network {
        /// The operation that failed, e.g. `fetching com.example:core:1.0`.
        operation: String,
        /// Reason for the failure.
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Other error.
    #[error("{message}")]
    Other {
        /// Generic error message.
        message: String,
    },
}

impl Clone for StrataError {
    fn clone(&self) -> Self {
        match self {
            Self::DescriptorRead {
                path,
                reason,
            } => Self::DescriptorRead {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::DescriptorParse {
                file,
                reason,
            } => Self::DescriptorParse {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::MissingParentCoordinate {
                field,
                descriptor,
            } => Self::MissingParentCoordinate {
                field: field.clone(),
                descriptor: descriptor.clone(),
            },
            Self::ParentNotFound {
                coordinate,
                source,
            } => Self::ParentNotFound {
                coordinate: coordinate.clone(),
                source: source.clone(),
            },
            Self::CyclicParentChain {
                chain,
            } => Self::CyclicParentChain {
                chain: chain.clone(),
            },
            Self::Interpolation {
                expression,
                reason,
            } => Self::Interpolation {
                expression: expression.clone(),
                reason: reason.clone(),
            },
            Self::Validation(report) => Self::Validation(report.clone()),
            Self::DependencyResolution {
                project,
                reason,
            } => Self::DependencyResolution {
                project: project.clone(),
                reason: reason.clone(),
            },
            Self::CircularDependency {
                chain,
            } => Self::CircularDependency {
                chain: chain.clone(),
            },
            Self::ArtifactNotFound {
                coordinate,
                repositories,
            } => Self::ArtifactNotFound {
                coordinate: coordinate.clone(),
                repositories: repositories.clone(),
            },
            Self::ChecksumMismatch {
                coordinate,
                expected,
                actual,
            } => Self::ChecksumMismatch {
                coordinate: coordinate.clone(),
                expected: expected.clone(),
                actual: actual.clone(),
            },
            Self::SettingsLoad {
                path,
                reason,
            } => Self::SettingsLoad {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::StoreLock {
                path,
                reason,
            } => Self::StoreLock {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::Network {
                operation,
                reason,
            } => Self::Network {
                operation: operation.clone(),
                reason: reason.clone(),
            },
            // Errors that don't implement Clone degrade to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::TomlSerError(e) => Self::Other {
                message: format!("TOML serialization error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// `ErrorContext` wraps a [`StrataError`] and adds optional suggestions for
/// resolution and additional details. This is the primary way the CLI
/// presents errors to users.
///
/// # Display Format
///
/// When displayed, errors show:
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error.
    pub error: StrataError,
    /// Optional suggestion for resolving the error.
    pub suggestion: Option<String>,
    /// Optional additional details about the error.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`StrataError`].
    #[must_use]
    pub const fn new(error: StrataError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable
/// suggestions.
///
/// This function is the entry point for converting arbitrary errors into
/// messages for CLI display. It recognizes [`StrataError`] variants anywhere
/// in the chain and common [`std::io::Error`] kinds, and falls back to the
/// full error chain for everything else.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(strata_error) = error.downcast_ref::<StrataError>() {
        return create_error_context(strata_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(StrataError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check file ownership or run with the required permissions")
                .with_details("strata could not read or write a file it needs");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(StrataError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(StrataError::DescriptorParse {
            file: "strata.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion(
            "Check the TOML syntax in your descriptor. Verify quotes, brackets, and table headers",
        )
        .with_details(
            "TOML parsing errors are usually caused by syntax issues like missing quotes or mismatched brackets",
        );
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(StrataError::Other {
        message,
    })
}

/// Create an appropriate [`ErrorContext`] with suggestions for specific
/// errors.
///
/// Each variant gets suggestions based on common resolution steps; messages
/// focus on what the user can do rather than engine internals.
fn create_error_context(error: StrataError) -> ErrorContext {
    match &error {
        StrataError::DescriptorRead { path, .. } => {
            let path = path.clone();
            ErrorContext::new(error.clone())
                .with_suggestion(format!(
                    "Check that '{path}' exists and is readable. Descriptor files are conventionally named strata.toml"
                ))
        }

        StrataError::DescriptorParse { file, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check the TOML syntax in {file}. Common issues: missing quotes, unmatched brackets, misplaced table headers"
            )),

        StrataError::MissingParentCoordinate { field, descriptor } => {
            ErrorContext::new(error.clone())
                .with_suggestion(format!(
                    "Fill in the '{field}' field of the [parent] section in {descriptor}, or remove the section to inherit from the built-in defaults"
                ))
                .with_details("A [parent] section must carry group, artifact, and version so the parent can be located")
        }

        StrataError::ParentNotFound { coordinate, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check that {coordinate} is published to a repository declared in the descriptor chain or in your settings, or install it into the local store"
            ))
            .with_details("Parents are looked up in the local store first, then in each accumulated repository in declaration order"),

        StrataError::CyclicParentChain { chain } => ErrorContext::new(error.clone())
            .with_suggestion("Remove one of the parent references so the chain terminates")
            .with_details(format!(
                "Parent chains must be acyclic; this walk revisited a coordinate: {chain}"
            )),

        StrataError::Interpolation { expression, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Define '{expression}' in [properties] (or inherit it from an ancestor), or fix the reference"
            ))
            .with_details("Expressions resolve against the descriptor's own properties and its project.group/artifact/version fields"),

        StrataError::Validation(report) => {
            let count = report.violations().len();
            ErrorContext::new(error.clone())
                .with_suggestion("Fix the listed problems in the descriptor chain and rebuild")
                .with_details(format!("{count} validation problem(s) were found; all are listed above"))
        }

        StrataError::CircularDependency { chain } => ErrorContext::new(error.clone())
            .with_suggestion("Review the dependency declarations and remove the circular reference")
            .with_details(format!(
                "Dependency cycle: {chain}. Artifacts cannot depend on themselves directly or indirectly"
            )),

        StrataError::ArtifactNotFound { coordinate, repositories } => {
            ErrorContext::new(error.clone())
                .with_suggestion(format!(
                    "Check that {coordinate} is published and that its repository is declared"
                ))
                .with_details(if repositories.is_empty() {
                    "No repositories were available to search".to_string()
                } else {
                    format!("Searched repositories in order: {}", repositories.join(", "))
                })
        }

        StrataError::ChecksumMismatch { .. } => ErrorContext::new(error.clone())
            .with_suggestion("The fetched file may be corrupted. Remove it from the store and retry")
            .with_details("The repository published a .sha256 checksum that does not match the fetched bytes"),

        StrataError::SettingsLoad { path, .. } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Check the TOML syntax in {path}, or delete the file to fall back to defaults"
            )),

        StrataError::StoreLock { .. } => ErrorContext::new(error.clone())
            .with_suggestion("Another strata process may be writing to the store; wait for it to finish"),

        _ => ErrorContext::new(error.clone()),
    }
}
