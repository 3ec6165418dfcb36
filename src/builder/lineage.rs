//! Lineage assembly: walking a descriptor's parent chain.
//!
//! Assembly descends from the requested descriptor toward the root
//! ancestor, locating each parent through the session cache first and the
//! repository locator second. Repositories declared along the way are
//! folded into one accumulated set *before* the parent lookup that needs
//! them, so an ancestor is only discoverable through repositories declared
//! at or below it. The walk records every parent coordinate it follows and
//! fails instead of looping when a coordinate repeats.

use crate::cache::DescriptorCache;
use crate::core::Coordinate;
use crate::core::error::StrataError;
use crate::descriptor::{Descriptor, RepositoryDecl, super_descriptor};
use crate::repository::{Repository, RepositoryLocator, build_repositories};
use crate::settings::Settings;
use crate::store::LocalStore;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a lineage level's raw descriptor came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorOrigin {
    /// Read from a local file named by the caller.
    File(PathBuf),
    /// Served from the session cache, no I/O.
    Cache(Coordinate),
    /// Located through the store or a repository, then read from the
    /// store path.
    Store(Coordinate, PathBuf),
}

impl DescriptorOrigin {
    /// The file backing this level, when one exists.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) | Self::Store(_, path) => Some(path),
            Self::Cache(_) => None,
        }
    }
}

impl fmt::Display for DescriptorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Cache(coordinate) => write!(f, "{coordinate} (cached)"),
            Self::Store(coordinate, _) => write!(f, "{coordinate}"),
        }
    }
}

/// One level of an assembled lineage: the raw descriptor and its origin.
///
/// Ancestor linkage is positional: entry `i`'s ancestor is entry `i - 1`.
#[derive(Debug, Clone)]
pub struct LineageEntry {
    /// The descriptor exactly as read, before any folding.
    pub descriptor: Descriptor,
    /// Where it came from.
    pub origin: DescriptorOrigin,
}

/// The repository set every walk starts from: the built-in super
/// descriptor's repositories, combined with settings overrides.
#[must_use]
pub fn super_repositories(settings: &Settings) -> Vec<Repository> {
    build_repositories(&super_descriptor().repositories, settings)
}

/// Walk the parent chain of the descriptor at `start`.
///
/// Returns the lineage ordered root-first (index 0 is the most distant
/// ancestor, the last entry is the requested descriptor) together with
/// the repository set accumulated while descending.
///
/// # Errors
///
/// - [`StrataError::DescriptorRead`] / [`StrataError::DescriptorParse`]
///   when any descriptor in the chain cannot be read or parsed.
/// - [`StrataError::MissingParentCoordinate`] when a `[parent]` section
///   leaves one of its fields blank.
/// - [`StrataError::ParentNotFound`] when the locator cannot resolve a
///   complete parent coordinate, wrapping the locator's error.
/// - [`StrataError::CyclicParentChain`] when the chain revisits a
///   coordinate already followed in this walk.
pub fn assemble_lineage(
    start: &Path,
    locator: &RepositoryLocator,
    store: &LocalStore,
    settings: &Settings,
    cache: &DescriptorCache,
) -> Result<(Vec<LineageEntry>, Vec<Repository>), StrataError> {
    let descriptor = Descriptor::load(start)?;

    let mut assembly = Assembly {
        locator,
        store,
        settings,
        cache,
        lineage: VecDeque::new(),
        repositories: super_repositories(settings),
        followed: Vec::new(),
        visited: HashSet::new(),
    };
    assembly.descend(descriptor, DescriptorOrigin::File(start.to_path_buf()))?;

    debug!(levels = assembly.lineage.len(), start = %start.display(), "lineage assembled");
    Ok((Vec::from(assembly.lineage), assembly.repositories))
}

/// State threaded through one recursive walk.
struct Assembly<'a> {
    locator: &'a RepositoryLocator,
    store: &'a LocalStore,
    settings: &'a Settings,
    cache: &'a DescriptorCache,
    /// In-progress chain; new entries are pushed to the front so the root
    /// ancestor ends up at index 0.
    lineage: VecDeque<LineageEntry>,
    repositories: Vec<Repository>,
    /// Parent coordinates in the order they were followed, for rendering
    /// the chain when a cycle is detected.
    followed: Vec<Coordinate>,
    visited: HashSet<Coordinate>,
}

impl Assembly<'_> {
    fn descend(
        &mut self,
        descriptor: Descriptor,
        origin: DescriptorOrigin,
    ) -> Result<(), StrataError> {
        let origin_label = origin.to_string();
        let parent_ref = descriptor.parent.clone();

        // Repositories must be visible before the parent lookup they serve.
        self.accumulate(&descriptor.repositories);
        self.lineage.push_front(LineageEntry {
            descriptor,
            origin,
        });

        let Some(parent_ref) = parent_ref else {
            // Lineage root.
            return Ok(());
        };

        if let Some(field) = parent_ref.first_blank_field() {
            return Err(StrataError::MissingParentCoordinate {
                field: field.to_string(),
                descriptor: origin_label,
            });
        }

        let coordinate = parent_ref.coordinate();
        if !self.visited.insert(coordinate.clone()) {
            let mut chain: Vec<String> =
                self.followed.iter().map(Coordinate::to_string).collect();
            chain.push(coordinate.to_string());
            return Err(StrataError::CyclicParentChain {
                chain: chain.join(" -> "),
            });
        }
        self.followed.push(coordinate.clone());

        if let Some(cached) = self.cache.get(&coordinate) {
            debug!(parent = %coordinate, "parent descriptor served from session cache");
            return self.descend(cached, DescriptorOrigin::Cache(coordinate));
        }

        let located = self
            .locator
            .locate_descriptor(&coordinate, &self.repositories, self.store)
            .map_err(|source| StrataError::ParentNotFound {
                coordinate: coordinate.to_string(),
                source: Box::new(source),
            })?;
        let parent = Descriptor::load(&located)?;
        self.descend(parent, DescriptorOrigin::Store(coordinate, located))
    }

    fn accumulate(&mut self, decls: &[RepositoryDecl]) {
        for decl in decls {
            let repository = Repository::from_decl(decl, self.settings);
            if !self.repositories.contains(&repository) {
                self.repositories.push(repository);
            }
        }
    }
}
