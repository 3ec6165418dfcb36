//! Project building sessions.
//!
//! A [`ProjectBuilder`] is one build session: it owns the session-scoped
//! descriptor cache, the repository locator, and the loaded settings, and
//! exposes the entry points that turn a descriptor file (or a published
//! coordinate) into a resolved [`Project`].
//!
//! Building happens in two phases. Lineage assembly
//! ([`lineage::assemble_lineage`]) walks the parent chain into a
//! root-first sequence of raw descriptors. The finishing pipeline then
//! folds that sequence into one effective model and post-processes it:
//! session cache write, interpolation, default injection, layout
//! alignment, artifact materialization, optional transitive resolution,
//! aggregate validation, and source-root registration, strictly in that
//! order.
//!
//! The builder also serves as the [`MetadataSource`] for transitive
//! resolution: asking for a coordinate's dependencies builds that
//! coordinate's own project (without resolving further), which seeds the
//! session cache as a side effect.

pub mod lineage;

use crate::artifact;
use crate::artifact::transitive::{GraphResolver, MetadataSource, TransitiveResolver};
use crate::cache::DescriptorCache;
use crate::constants::{DESCRIPTOR_FILE, STANDALONE_ARTIFACT, STANDALONE_GROUP, STANDALONE_VERSION};
use crate::core::Coordinate;
use crate::core::error::StrataError;
use crate::descriptor::{DependencyDecl, Descriptor, Identity, super_descriptor};
use crate::inherit::fold_lineage;
use crate::interpolate::interpolate;
use crate::project::paths::align_layout;
use crate::project::{Project, SourceRoots};
use crate::repository::{Repository, RepositoryLocator, build_repositories};
use crate::settings::Settings;
use crate::store::LocalStore;
use anyhow::Context;
use lineage::{assemble_lineage, super_repositories};
use std::path::Path;
use tracing::{debug, info};

/// One build session.
///
/// The cache lives exactly as long as the builder, so concurrent sessions
/// get independent caches by construction. A single builder may be shared
/// across threads; the cache handles per-coordinate atomicity.
pub struct ProjectBuilder {
    settings: Settings,
    cache: DescriptorCache,
    locator: RepositoryLocator,
    resolver: GraphResolver,
}

impl ProjectBuilder {
    /// Create a session with settings loaded from the environment.
    ///
    /// # Errors
    ///
    /// Fails when a settings file exists but cannot be read or parsed.
    /// Repository resolution needs settings, so this is checked up front.
    pub fn new() -> anyhow::Result<Self> {
        let settings = Settings::load().context("failed to load settings")?;
        Ok(Self::with_settings(settings))
    }

    /// Create a session over explicit settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            cache: DescriptorCache::new(),
            locator: RepositoryLocator::new(),
            resolver: GraphResolver::new(),
        }
    }

    /// The settings this session resolves repositories with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the project model for the descriptor file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the descriptor chain cannot be assembled, interpolated,
    /// or validated, or when `resolve_dependencies` is set and transitive
    /// resolution fails. The typed [`StrataError`] stays downcastable
    /// through the returned error.
    pub fn build_from_descriptor(
        &self,
        path: &Path,
        store: &LocalStore,
        resolve_dependencies: bool,
    ) -> anyhow::Result<Project> {
        let project = self
            .build_internal(path, store, resolve_dependencies, true)
            .with_context(|| format!("failed to build project model from {}", path.display()))?;
        Ok(project)
    }

    /// Build with transitive dependency resolution enabled.
    pub fn build_with_dependencies(
        &self,
        path: &Path,
        store: &LocalStore,
    ) -> anyhow::Result<Project> {
        self.build_from_descriptor(path, store, true)
    }

    /// Build the project model for a published coordinate.
    ///
    /// Locates the coordinate's own descriptor first, then builds it as a
    /// non-top-level request: layout stays as declared and the session
    /// cache keeps any earlier entry for the coordinate.
    ///
    /// # Errors
    ///
    /// Fails when the coordinate cannot be located in the store or the
    /// default repositories, or when the located descriptor fails to build.
    pub fn build_from_artifact(
        &self,
        coordinate: &Coordinate,
        store: &LocalStore,
    ) -> anyhow::Result<Project> {
        let repositories = super_repositories(&self.settings);
        let project = self
            .locator
            .locate_descriptor(coordinate, &repositories, store)
            .and_then(|located| self.build_internal(&located, store, false, false))
            .with_context(|| format!("failed to build project model from {coordinate}"))?;
        Ok(project)
    }

    /// Build the standalone project carried by the built-in defaults.
    ///
    /// The universal root of all inheritance: no descriptor file, no
    /// parent, repositories from the embedded super descriptor. The
    /// reserved stub identity is applied here and only here.
    ///
    /// # Errors
    ///
    /// Fails only when finishing the built-in defaults fails, which means
    /// the embedded descriptor is defective.
    pub fn build_super_project(&self, store: &LocalStore) -> anyhow::Result<Project> {
        let mut descriptor = super_descriptor();
        descriptor.project = Identity {
            group: Some(STANDALONE_GROUP.to_string()),
            artifact: Some(STANDALONE_ARTIFACT.to_string()),
            version: Some(STANDALONE_VERSION.to_string()),
        };

        let raw = descriptor.clone();
        let origin = Path::new(".").join(DESCRIPTOR_FILE);
        let project = self
            .finish(descriptor, &raw, &origin, store, false, false)
            .context("failed to build project model from built-in defaults")?;
        Ok(project)
    }

    /// Read access to the session cache.
    ///
    /// Collaborators use this to check whether a coordinate was already
    /// resolved in this session before going through the locator.
    #[must_use]
    pub fn cached_descriptor(&self, coordinate: &Coordinate) -> Option<Descriptor> {
        self.cache.get(coordinate)
    }

    fn build_internal(
        &self,
        path: &Path,
        store: &LocalStore,
        resolve_dependencies: bool,
        top_level: bool,
    ) -> Result<Project, StrataError> {
        // Layout alignment needs an absolute anchor.
        let start = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let (entries, _accumulated) =
            assemble_lineage(&start, &self.locator, store, &self.settings, &self.cache)?;

        let raws: Vec<Descriptor> =
            entries.iter().map(|entry| entry.descriptor.clone()).collect();
        let effectives = fold_lineage(&raws, &super_descriptor());

        let (Some(leaf_entry), Some(leaf_effective)) = (entries.last(), effectives.last())
        else {
            return Err(StrataError::Other {
                message: format!("no descriptors assembled from {}", start.display()),
            });
        };

        // Ancestor projects keep their own effective model for diagnostics.
        let mut ancestors: Option<Box<Project>> = None;
        for (entry, effective) in entries.iter().zip(&effectives).take(entries.len() - 1) {
            let mut ancestor =
                Project::new(effective.clone(), entry.origin.path().map(Path::to_path_buf));
            ancestor.parent = ancestors.take();
            ancestors = Some(Box::new(ancestor));
        }

        let mut project = self.finish(
            leaf_effective.clone(),
            &leaf_entry.descriptor,
            &start,
            store,
            resolve_dependencies,
            top_level,
        )?;
        project.parent = ancestors;
        Ok(project)
    }

    /// The finishing pipeline. Step order is load-bearing: interpolation
    /// must precede default injection (injected defaults are literal),
    /// validation sees the fully resolved model, and the cache write
    /// happens first so a failed finish still leaves the raw descriptor
    /// available to the session.
    fn finish(
        &self,
        effective: Descriptor,
        raw: &Descriptor,
        origin_file: &Path,
        store: &LocalStore,
        resolve_dependencies: bool,
        top_level: bool,
    ) -> Result<Project, StrataError> {
        // 1. Session cache, keyed by the effective identity. The top-level
        //    request is the authoritative read and always overwrites; any
        //    other build keeps the first entry written this session.
        if let Some(coordinate) = effective.identity_coordinate() {
            if top_level {
                self.cache.insert(coordinate, raw.clone());
            } else {
                self.cache.insert_if_absent(coordinate, raw.clone());
            }
        }

        // 2. Interpolation.
        let resolved = interpolate(&effective)?;

        // 3. Default injection.
        let mut resolved = resolved.with_defaults();

        // 4. Layout alignment, only for the originally requested descriptor.
        if top_level {
            let base = origin_file.parent().unwrap_or_else(|| Path::new("."));
            resolved.layout = align_layout(&resolved.layout, base);
        }

        // 5. Artifact materialization.
        let mut artifacts = artifact::materialize(&resolved.dependencies, store);

        // 6. Optional transitive resolution.
        if resolve_dependencies {
            let repositories = build_repositories(&resolved.repositories, &self.settings);
            debug!(
                project = %resolved.display_name(),
                direct = resolved.dependencies.len(),
                "resolving dependencies transitively"
            );
            let transitive = self
                .resolver
                .resolve(&resolved.dependencies, &repositories, store, self)
                .map_err(|error| StrataError::DependencyResolution {
                    project: resolved.display_name(),
                    reason: error.to_string(),
                })?;
            for artifact in transitive {
                if !artifacts.contains(&artifact) {
                    artifacts.push(artifact);
                }
            }
        }

        // 7. Aggregate validation over the fully resolved model.
        crate::descriptor::validation::validate(&resolved).into_result()?;

        // 8. Source-root registration.
        let mut project = Project::new(resolved, Some(origin_file.to_path_buf()));
        project.source_roots = SourceRoots::from_layout(&project.effective.layout);
        project.artifacts = artifacts;

        info!(project = %project.display_name(), top_level, "project model resolved");
        Ok(project)
    }
}

impl MetadataSource for ProjectBuilder {
    fn dependencies_of(
        &self,
        coordinate: &Coordinate,
        repositories: &[Repository],
        store: &LocalStore,
    ) -> Result<Vec<DependencyDecl>, StrataError> {
        // A parentless descriptor inherits nothing, so a cache hit skips
        // only the locator; interpolation and default injection still run
        // and the declarations come out the same as from a full build.
        if let Some(raw) = self.cached_descriptor(coordinate)
            && raw.parent.is_none()
        {
            debug!(coordinate = %coordinate, "dependency metadata served from session cache");
            return Ok(interpolate(&raw)?.with_defaults().dependencies);
        }

        let located = self.locator.locate_descriptor(coordinate, repositories, store)?;
        let project = self.build_internal(&located, store, false, false)?;
        Ok(project.effective.dependencies)
    }
}
