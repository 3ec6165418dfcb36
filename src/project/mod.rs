//! The caller-facing project model.
//!
//! A [`Project`] wraps the effective descriptor produced by inheritance
//! folding plus everything finishing derives from it: registered source
//! roots, materialized artifacts, the ancestor chain, and the file the
//! descriptor came from. Projects are replaced, never mutated, as the
//! finishing pipeline runs.

pub mod paths;

use crate::artifact::Artifact;
use crate::core::Coordinate;
use crate::descriptor::{Descriptor, SourceLayout};
use std::path::{Path, PathBuf};

/// The three build path kinds registered during finishing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRoots {
    /// Main sources.
    pub main: Option<PathBuf>,
    /// Script sources.
    pub script: Option<PathBuf>,
    /// Test sources.
    pub test: Option<PathBuf>,
}

impl SourceRoots {
    /// Record the layout of a resolved descriptor.
    #[must_use]
    pub fn from_layout(layout: &SourceLayout) -> Self {
        Self {
            main: layout.source_dir.as_ref().map(PathBuf::from),
            script: layout.script_source_dir.as_ref().map(PathBuf::from),
            test: layout.test_source_dir.as_ref().map(PathBuf::from),
        }
    }
}

/// A resolved project model for one lineage level.
///
/// The leaf of a build request carries artifacts and source roots;
/// ancestor projects reachable through [`parent`](Self::parent) carry
/// their own effective descriptor and origin for diagnostics.
#[derive(Debug, Clone)]
pub struct Project {
    /// Effective descriptor after folding and finishing.
    pub effective: Descriptor,
    /// The descriptor file this level was read from, when it came from one.
    pub file: Option<PathBuf>,
    /// The project one lineage level up.
    pub parent: Option<Box<Project>>,
    /// Materialized dependency artifacts.
    pub artifacts: Vec<Artifact>,
    /// Registered source roots.
    pub source_roots: SourceRoots,
}

impl Project {
    /// Wrap an effective descriptor and its origin file.
    #[must_use]
    pub fn new(effective: Descriptor, file: Option<PathBuf>) -> Self {
        Self {
            effective,
            file,
            parent: None,
            artifacts: Vec::new(),
            source_roots: SourceRoots::default(),
        }
    }

    /// Identity of this project, when the effective model carries all
    /// three components.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.effective.identity_coordinate()
    }

    /// Name for logs and error messages; unresolved fragments render `?`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.effective.display_name()
    }

    /// Directory holding the descriptor file.
    #[must_use]
    pub fn basedir(&self) -> Option<&Path> {
        self.file.as_deref().and_then(Path::parent)
    }

    /// The parent project, when this level has one.
    #[must_use]
    pub fn parent(&self) -> Option<&Project> {
        self.parent.as_deref()
    }

    /// Depth of the ancestor chain, the project itself included.
    #[must_use]
    pub fn lineage_depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.parent();
        while let Some(project) = current {
            depth += 1;
            current = project.parent();
        }
        depth
    }
}
