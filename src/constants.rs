//! Global constants used throughout the strata codebase.
//!
//! This module contains descriptor defaults, naming conventions, and other
//! fixed values that are used across multiple modules. Defining them
//! centrally improves maintainability and makes magic strings more
//! discoverable.

use std::time::Duration;

/// Conventional file name for a project descriptor.
pub const DESCRIPTOR_FILE: &str = "strata.toml";

/// File extension used when a descriptor is stored by coordinate.
pub const DESCRIPTOR_EXTENSION: &str = "toml";

/// Default main source directory, injected when a descriptor leaves it unset.
pub const DEFAULT_SOURCE_DIR: &str = "src/main";

/// Default test source directory.
pub const DEFAULT_TEST_SOURCE_DIR: &str = "src/test";

/// Default script source directory.
pub const DEFAULT_SCRIPT_SOURCE_DIR: &str = "src/scripts";

/// Default artifact kind for dependencies that do not declare one.
pub const DEFAULT_DEPENDENCY_KIND: &str = "lib";

/// Default scope for dependencies that do not declare one.
pub const DEFAULT_DEPENDENCY_SCOPE: &str = "compile";

/// Group of the stub identity stamped onto the standalone super project.
///
/// Reserved so it can never collide with a real project: descriptors in the
/// wild must not use this group.
pub const STANDALONE_GROUP: &str = "io.strata.internal";

/// Artifact of the standalone super project's stub identity.
pub const STANDALONE_ARTIFACT: &str = "standalone";

/// Version of the standalone super project's stub identity.
pub const STANDALONE_VERSION: &str = "0";

/// Maximum nesting depth for `${...}` expressions during interpolation.
///
/// A reference chain deeper than this is treated as cyclic.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Connect timeout for remote repository fetches (30 seconds).
///
/// Applied at the HTTP client boundary only; the engine itself carries no
/// timeout semantics.
pub const FETCH_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable overriding the settings file location.
pub const SETTINGS_PATH_ENV: &str = "STRATA_SETTINGS_PATH";

/// Environment variable overriding the local store location.
pub const STORE_PATH_ENV: &str = "STRATA_STORE_PATH";
