//! The local artifact store.
//!
//! One directory tree, conventionally `~/.strata/store`, where every
//! descriptor and artifact strata has ever resolved lands. Repository
//! fetches install into the store; lineage assembly and artifact
//! materialization read from it. The layout mirrors coordinates:
//!
//! ```text
//! {root}/{group with dots as separators}/{artifact}/{version}/
//!     {artifact}-{version}.toml        descriptor
//!     {artifact}-{version}.{kind}      artifact payload
//!     {artifact}-{version}.toml.sha256 checksum sibling
//! ```
//!
//! Installs are staged through a temp file in the destination directory and
//! renamed into place, under a per-coordinate [`lock::StoreLock`], so a
//! reader never observes a half-written file even with concurrent strata
//! processes sharing the store.

pub mod lock;

use crate::constants::DESCRIPTOR_EXTENSION;
use crate::core::Coordinate;
use crate::core::error::StrataError;
use lock::StoreLock;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to a store directory.
///
/// Cheap to clone; carries only the root path. The directory itself is
/// created lazily on first install.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Open the store rooted at `root`.
    #[must_use]
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
        }
    }

    /// The store's root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every file of one coordinate.
    #[must_use]
    pub fn coordinate_dir(&self, coordinate: &Coordinate) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in coordinate.group.split('.') {
            dir.push(segment);
        }
        dir.push(&coordinate.artifact);
        dir.push(&coordinate.version);
        dir
    }

    /// Path of the descriptor file for `coordinate`.
    #[must_use]
    pub fn descriptor_path(&self, coordinate: &Coordinate) -> PathBuf {
        self.coordinate_dir(coordinate).join(format!(
            "{}-{}.{}",
            coordinate.artifact, coordinate.version, DESCRIPTOR_EXTENSION
        ))
    }

    /// Path of the artifact payload of the given kind for `coordinate`.
    #[must_use]
    pub fn artifact_path(&self, coordinate: &Coordinate, kind: &str) -> PathBuf {
        self.coordinate_dir(coordinate)
            .join(format!("{}-{}.{kind}", coordinate.artifact, coordinate.version))
    }

    /// True when the store already holds a descriptor for `coordinate`.
    #[must_use]
    pub fn contains_descriptor(&self, coordinate: &Coordinate) -> bool {
        self.descriptor_path(coordinate).is_file()
    }

    /// Install descriptor `content` for `coordinate`, returning the
    /// installed path.
    pub fn install_descriptor(
        &self,
        coordinate: &Coordinate,
        content: &str,
    ) -> Result<PathBuf, StrataError> {
        let target = self.descriptor_path(coordinate);
        self.install(coordinate, &target, content.as_bytes())?;
        Ok(target)
    }

    /// Install an artifact payload of the given kind for `coordinate`.
    pub fn install_artifact(
        &self,
        coordinate: &Coordinate,
        kind: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StrataError> {
        let target = self.artifact_path(coordinate, kind);
        self.install(coordinate, &target, bytes)?;
        Ok(target)
    }

    /// Staged write: temp file in the destination directory, rename into
    /// place, then the checksum sibling.
    fn install(
        &self,
        coordinate: &Coordinate,
        target: &Path,
        bytes: &[u8],
    ) -> Result<(), StrataError> {
        let _lock = StoreLock::acquire(&self.root, &lock_name(coordinate))?;

        let parent = target.parent().ok_or_else(|| StrataError::Other {
            message: format!("store path {} has no parent directory", target.display()),
        })?;
        std::fs::create_dir_all(parent)?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)?;
        staged.write_all(bytes)?;
        staged.persist(target).map_err(|e| StrataError::IoError(e.error))?;

        let digest = hex::encode(Sha256::digest(bytes));
        let sibling = checksum_sibling(target);
        std::fs::write(&sibling, format!("{digest}\n"))?;

        debug!(target = %target.display(), sha256 = %digest, "installed into store");
        Ok(())
    }
}

/// Path of the `.sha256` sibling recorded next to an installed file.
#[must_use]
pub fn checksum_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".sha256");
    path.with_file_name(name)
}

fn lock_name(coordinate: &Coordinate) -> String {
    coordinate.to_string().replace(':', "_")
}
