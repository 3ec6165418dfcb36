//! Core types for strata.
//!
//! This module forms the foundation of the engine's type system: the
//! coordinate value type that identifies descriptors, and the error handling
//! used throughout the codebase.
//!
//! # Modules
//!
//! ## `coordinate` - Project Identity
//!
//! - [`Coordinate`] - exact `group:artifact:version` identity, the key for
//!   the descriptor cache and repository lookups
//! - [`ParseCoordinateError`] - returned when parsing a coordinate string
//!   fails
//!
//! ## `error` - Error Handling
//!
//! - [`StrataError`] - enumerated error types covering all failure modes
//! - [`ErrorContext`] - user-friendly error wrapper with suggestions
//! - [`user_friendly_error`] - convert any error to user-friendly format
//!
//! # Design Principles
//!
//! Every operation that can fail returns a [`Result`] with meaningful error
//! information; user-facing errors carry contextual suggestions. Strong
//! typing keeps invalid identities out of the engine: a [`Coordinate`]
//! always has all three components, and descriptors with partial identity
//! use `Option` fields instead.

pub mod coordinate;
pub mod error;

pub use coordinate::{Coordinate, ParseCoordinateError};
pub use error::{ErrorContext, StrataError, user_friendly_error};
