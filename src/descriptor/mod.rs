//! Project descriptor model and parsing for strata.
//!
//! This module handles `strata.toml` descriptor files, the declarative
//! description of a build unit: its identity, its optional parent, its
//! source layout, and its declared repositories, dependencies, and
//! properties.
//!
//! # Basic Structure
//!
//! ```toml
//! [project]
//! group = "com.example.platform"
//! artifact = "billing"
//! version = "2.4.0"
//!
//! [parent]
//! group = "com.example.platform"
//! artifact = "parent"
//! version = "2.4.0"
//!
//! [layout]
//! source-dir = "src/main"
//!
//! [[repositories]]
//! id = "central"
//! url = "https://repo.example.io/artifacts"
//!
//! [[dependencies]]
//! group = "com.example"
//! artifact = "commons"
//! version = "1.1"
//!
//! [properties]
//! "product.line" = "alpha"
//! ```
//!
//! Every `[project]` field is individually optional: a module typically
//! declares only `artifact` and inherits `group` and `version` from its
//! parent. The artifact name itself is never inherited.
//!
//! # Immutability
//!
//! A [`Descriptor`] is never mutated once read. Inheritance folding,
//! interpolation, and default injection all produce new values, which is
//! what makes the descriptor cache safe to share.
//!
//! # Integration
//!
//! Works with [`crate::builder`] for lineage assembly, [`crate::inherit`]
//! for folding, and [`crate::cache`] for coordinate-keyed reuse.

pub mod validation;

mod io;

use crate::constants::{
    DEFAULT_DEPENDENCY_KIND, DEFAULT_DEPENDENCY_SCOPE, DEFAULT_SCRIPT_SOURCE_DIR,
    DEFAULT_SOURCE_DIR, DEFAULT_TEST_SOURCE_DIR,
};
use crate::core::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Built-in super descriptor, the implicit root of every lineage.
///
/// Declares the central repository and nothing else. Deliberately carries no
/// identity: group and version must come from real ancestors or the
/// descriptor itself, and validation fails builds that never supply them.
const SUPER_DESCRIPTOR_TOML: &str = include_str!("super.toml");

/// A raw project descriptor as read from a `strata.toml` file.
///
/// All fields reflect exactly what the file declared. Use
/// [`crate::inherit::fold_lineage`] to resolve inherited fields and
/// [`Descriptor::with_defaults`] to fill in the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Descriptor {
    /// Identity of this project. Each field may be omitted and inherited.
    #[serde(default, skip_serializing_if = "Identity::is_empty")]
    pub project: Identity,

    /// Reference to the parent descriptor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    /// Source directory layout.
    #[serde(default, skip_serializing_if = "SourceLayout::is_empty")]
    pub layout: SourceLayout,

    /// Repositories this project publishes to / resolves from, in
    /// declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryDecl>,

    /// Declared dependencies, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<DependencyDecl>,

    /// Free-form properties, available to `${...}` interpolation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

/// The `[project]` identity section.
///
/// Fields are individually optional so modules can inherit group and
/// version from their parent. `artifact` is optional in the raw form too,
/// but validation requires it on the finished model since it is never
/// inherited.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Identity {
    /// Organizational namespace, inheritable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Name unique within the group. Never inherited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    /// Version label, inheritable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Identity {
    /// True when no identity field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.artifact.is_none() && self.version.is_none()
    }
}

/// The `[parent]` section: a coordinate naming the parent descriptor.
///
/// Fields default to empty strings when omitted so an incomplete reference
/// parses cleanly and fails assembly with a precise "missing field" error
/// rather than a TOML error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParentRef {
    /// Parent group. Must be non-blank.
    #[serde(default)]
    pub group: String,
    /// Parent artifact. Must be non-blank.
    #[serde(default)]
    pub artifact: String,
    /// Parent version. Must be non-blank.
    #[serde(default)]
    pub version: String,
}

impl ParentRef {
    /// The name of the first blank coordinate field, if any.
    ///
    /// Checked before any lookup so an incomplete reference is reported as
    /// a structural error, never as "parent not found".
    #[must_use]
    pub fn first_blank_field(&self) -> Option<&'static str> {
        if self.group.trim().is_empty() {
            Some("group")
        } else if self.artifact.trim().is_empty() {
            Some("artifact")
        } else if self.version.trim().is_empty() {
            Some("version")
        } else {
            None
        }
    }

    /// The coordinate this reference names.
    ///
    /// Only meaningful when [`Self::first_blank_field`] is `None`.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group.clone(), self.artifact.clone(), self.version.clone())
    }
}

/// The `[layout]` section: where sources live relative to the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SourceLayout {
    /// Main source directory. Defaults to `src/main`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,
    /// Test source directory. Defaults to `src/test`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_source_dir: Option<String>,
    /// Script source directory. Defaults to `src/scripts`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_source_dir: Option<String>,
}

impl SourceLayout {
    /// True when no layout field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_dir.is_none()
            && self.test_source_dir.is_none()
            && self.script_source_dir.is_none()
    }
}

/// One `[[repositories]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryDecl {
    /// Identifier unique within one descriptor, the merge key across the
    /// lineage.
    pub id: String,
    /// Repository root URL: `https://`, `http://`, `file://`, or a bare
    /// filesystem path.
    pub url: String,
}

/// One `[[dependencies]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyDecl {
    /// Dependency group.
    pub group: String,
    /// Dependency artifact.
    pub artifact: String,
    /// Dependency version.
    pub version: String,
    /// Artifact kind. Defaults to `lib` when left unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Resolution scope. Defaults to `compile` when left unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl DependencyDecl {
    /// Merge identity across a lineage: version never participates, so a
    /// child redeclaring a dependency at another version overrides it.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        (self.group.clone(), self.artifact.clone())
    }

    /// The full coordinate this declaration names.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.group.clone(), self.artifact.clone(), self.version.clone())
    }

    /// Effective kind after default injection.
    #[must_use]
    pub fn kind_or_default(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_DEPENDENCY_KIND)
    }

    /// Effective scope after default injection.
    #[must_use]
    pub fn scope_or_default(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_DEPENDENCY_SCOPE)
    }
}

impl Descriptor {
    /// Create an empty descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The full identity coordinate, if all three fields are set and
    /// non-blank.
    #[must_use]
    pub fn identity_coordinate(&self) -> Option<Coordinate> {
        match (&self.project.group, &self.project.artifact, &self.project.version) {
            (Some(group), Some(artifact), Some(version))
                if !group.trim().is_empty()
                    && !artifact.trim().is_empty()
                    && !version.trim().is_empty() =>
            {
                Some(Coordinate::new(group.clone(), artifact.clone(), version.clone()))
            }
            _ => None,
        }
    }

    /// A display name for diagnostics: the coordinate when identity is
    /// complete, otherwise whatever fragments exist.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.identity_coordinate() {
            Some(coordinate) => coordinate.to_string(),
            None => format!(
                "{}:{}:{}",
                self.project.group.as_deref().unwrap_or("?"),
                self.project.artifact.as_deref().unwrap_or("?"),
                self.project.version.as_deref().unwrap_or("?"),
            ),
        }
    }

    /// Return a copy with the built-in defaults filled into unset fields.
    ///
    /// Runs after interpolation so the injected values are always literal:
    /// layout directories fall back to `src/main`, `src/test`, and
    /// `src/scripts`, and each dependency gets `kind = "lib"` and
    /// `scope = "compile"` where unset.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        let mut out = self.clone();

        out.layout.source_dir =
            Some(out.layout.source_dir.unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string()));
        out.layout.test_source_dir =
            Some(out.layout.test_source_dir.unwrap_or_else(|| DEFAULT_TEST_SOURCE_DIR.to_string()));
        out.layout.script_source_dir = Some(
            out.layout.script_source_dir.unwrap_or_else(|| DEFAULT_SCRIPT_SOURCE_DIR.to_string()),
        );

        for dependency in &mut out.dependencies {
            dependency.kind = Some(dependency.kind.take().unwrap_or_else(|| DEFAULT_DEPENDENCY_KIND.to_string()));
            dependency.scope =
                Some(dependency.scope.take().unwrap_or_else(|| DEFAULT_DEPENDENCY_SCOPE.to_string()));
        }

        out
    }
}

/// Parse the built-in super descriptor.
///
/// Infallible in practice: the embedded TOML is covered by a test, so a
/// parse failure is a build defect rather than a runtime condition.
#[must_use]
pub fn super_descriptor() -> Descriptor {
    toml::from_str(SUPER_DESCRIPTOR_TOML)
        .unwrap_or_else(|e| panic!("embedded super descriptor is invalid: {e}"))
}
