//! Concrete repositories and descriptor location.
//!
//! A descriptor declares repositories as `id` + `url` pairs. Before they
//! can be searched they are turned into concrete [`Repository`] values:
//! settings overrides are applied by id (mirror redirection), values are
//! shell-expanded, and duplicates are dropped while preserving first-seen
//! order. That construction requires loaded settings, which is why settings
//! failures are hard errors for any repository-needing operation.
//!
//! [`RepositoryLocator`] then resolves a coordinate to a local descriptor
//! file: the store is consulted first, then each repository in order.
//! Remote (`https://`, `http://`) repositories are fetched over blocking
//! HTTP; `file://` URLs and bare paths are read directly. Every hit is
//! installed into the store before the path is returned, so repeated
//! builds are served locally.
//!
//! When a repository publishes a `.sha256` sibling for a descriptor, the
//! fetched bytes are verified against it; a mismatch is a hard error. A
//! missing checksum is tolerated.

use crate::constants::{DESCRIPTOR_EXTENSION, FETCH_CONNECT_TIMEOUT};
use crate::core::Coordinate;
use crate::core::error::StrataError;
use crate::descriptor::RepositoryDecl;
use crate::settings::Settings;
use crate::store::{LocalStore, checksum_sibling};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A repository ready to be searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Identifier, carried through from the declaration.
    pub id: String,
    /// Effective URL after settings overrides and shell expansion.
    pub url: String,
}

impl Repository {
    /// Build a concrete repository from a declaration, applying any
    /// settings override for its id.
    #[must_use]
    pub fn from_decl(decl: &RepositoryDecl, settings: &Settings) -> Self {
        let url = match settings.url_override(&decl.id) {
            Some(replacement) => {
                debug!(id = %decl.id, url = %replacement, "repository overridden by settings");
                replacement
            }
            None => shellexpand::tilde(&decl.url).into_owned(),
        };
        Self {
            id: decl.id.clone(),
            url,
        }
    }

    /// The local directory this repository serves from, when it is not a
    /// remote one.
    #[must_use]
    pub fn local_root(&self) -> Option<PathBuf> {
        if let Some(stripped) = self.url.strip_prefix("file://") {
            return Some(PathBuf::from(stripped));
        }
        if self.url.contains("://") {
            return None;
        }
        Some(PathBuf::from(&self.url))
    }
}

/// Turn declared repositories into concrete ones, dropping duplicates.
///
/// Order is preserved; the first occurrence of an equal repository wins.
/// Declaration order is search order, so this keeps descent-order
/// accumulation observable.
#[must_use]
pub fn build_repositories(decls: &[RepositoryDecl], settings: &Settings) -> Vec<Repository> {
    let mut repositories: Vec<Repository> = Vec::with_capacity(decls.len());
    for decl in decls {
        let repository = Repository::from_decl(decl, settings);
        if !repositories.contains(&repository) {
            repositories.push(repository);
        }
    }
    repositories
}

/// Resolves coordinates to local descriptor files.
///
/// Holds the HTTP client; one locator serves a whole build session.
#[derive(Debug)]
pub struct RepositoryLocator {
    client: reqwest::blocking::Client,
}

impl Default for RepositoryLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryLocator {
    /// Create a locator with the standard connect timeout.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(FETCH_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self {
            client,
        }
    }

    /// Resolve `coordinate` to a descriptor file on disk.
    ///
    /// Search order: the store, then each repository in the order given.
    /// A repository hit is installed into the store and the store path
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`StrataError::ArtifactNotFound`] when the store and every
    ///   repository miss; the error lists the repositories searched.
    /// - [`StrataError::ChecksumMismatch`] when a repository publishes a
    ///   checksum the fetched bytes do not match.
    /// - [`StrataError::Network`] when a remote repository fails at the
    ///   transport level (a miss is a 404, not a transport failure).
    pub fn locate_descriptor(
        &self,
        coordinate: &Coordinate,
        repositories: &[Repository],
        store: &LocalStore,
    ) -> Result<PathBuf, StrataError> {
        if store.contains_descriptor(coordinate) {
            let path = store.descriptor_path(coordinate);
            debug!(coordinate = %coordinate, "descriptor served from store");
            return Ok(path);
        }

        for repository in repositories {
            let fetched = match repository.local_root() {
                Some(root) => self.fetch_local(coordinate, repository, &root)?,
                None => self.fetch_remote(coordinate, repository)?,
            };

            if let Some(content) = fetched {
                let path = store.install_descriptor(coordinate, &content)?;
                info!(coordinate = %coordinate, repository = %repository.id, "descriptor fetched");
                return Ok(path);
            }
            debug!(coordinate = %coordinate, repository = %repository.id, "descriptor not in repository");
        }

        Err(StrataError::ArtifactNotFound {
            coordinate: coordinate.to_string(),
            repositories: repositories
                .iter()
                .map(|r| format!("{} ({})", r.id, r.url))
                .collect(),
        })
    }

    /// Read from a filesystem repository. `Ok(None)` when the descriptor
    /// file is absent.
    fn fetch_local(
        &self,
        coordinate: &Coordinate,
        repository: &Repository,
        root: &Path,
    ) -> Result<Option<String>, StrataError> {
        let mut path = root.to_path_buf();
        for segment in relative_descriptor_segments(coordinate) {
            path.push(segment);
        }
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path)?;
        if let Ok(published) = std::fs::read_to_string(checksum_sibling(&path)) {
            verify_checksum(coordinate, &published, &bytes)?;
        }

        decode_descriptor(coordinate, repository, &bytes).map(Some)
    }

    /// Fetch over HTTP(S). `Ok(None)` on 404; transport failures and other
    /// HTTP statuses are hard errors.
    fn fetch_remote(
        &self,
        coordinate: &Coordinate,
        repository: &Repository,
    ) -> Result<Option<String>, StrataError> {
        let url = remote_descriptor_url(repository, coordinate);
        let operation = format!("fetching {coordinate} from {}", repository.id);

        let response = self.client.get(&url).send().map_err(|e| StrataError::Network {
            operation: operation.clone(),
            reason: e.to_string(),
        })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StrataError::Network {
                operation,
                reason: format!("{url} returned HTTP {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| StrataError::Network {
                operation: operation.clone(),
                reason: e.to_string(),
            })?
            .to_vec();

        if let Some(published) = self.fetch_remote_checksum(&url)? {
            verify_checksum(coordinate, &published, &bytes)?;
        } else {
            warn!(coordinate = %coordinate, repository = %repository.id, "no checksum published, skipping verification");
        }

        decode_descriptor(coordinate, repository, &bytes).map(Some)
    }

    /// The published `.sha256` content for a fetched URL, if any.
    fn fetch_remote_checksum(&self, url: &str) -> Result<Option<String>, StrataError> {
        let checksum_url = format!("{url}.sha256");
        let response = match self.client.get(&checksum_url).send() {
            Ok(response) => response,
            // Checksums are best-effort; an unreachable sibling is a miss.
            Err(_) => return Ok(None),
        };

        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(response.text().ok())
    }
}

/// Path of one coordinate's descriptor, relative to a repository root.
fn relative_descriptor_segments(coordinate: &Coordinate) -> Vec<String> {
    let mut segments: Vec<String> =
        coordinate.group.split('.').map(str::to_string).collect();
    segments.push(coordinate.artifact.clone());
    segments.push(coordinate.version.clone());
    segments.push(format!(
        "{}-{}.{}",
        coordinate.artifact, coordinate.version, DESCRIPTOR_EXTENSION
    ));
    segments
}

fn remote_descriptor_url(repository: &Repository, coordinate: &Coordinate) -> String {
    format!(
        "{}/{}",
        repository.url.trim_end_matches('/'),
        relative_descriptor_segments(coordinate).join("/")
    )
}

fn decode_descriptor(
    coordinate: &Coordinate,
    repository: &Repository,
    bytes: &[u8],
) -> Result<String, StrataError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| StrataError::DescriptorParse {
        file: format!("{coordinate} ({})", repository.id),
        reason: "descriptor content is not valid UTF-8".to_string(),
    })
}

/// Compare fetched bytes against a published checksum.
///
/// The published form may carry a trailing filename (`<hex>  <name>`);
/// only the first token counts. Comparison is case-insensitive.
fn verify_checksum(
    coordinate: &Coordinate,
    published: &str,
    bytes: &[u8],
) -> Result<(), StrataError> {
    let Some(expected) = published.split_whitespace().next() else {
        return Ok(());
    };
    let actual = hex::encode(Sha256::digest(bytes));
    if expected.eq_ignore_ascii_case(&actual) {
        Ok(())
    } else {
        Err(StrataError::ChecksumMismatch {
            coordinate: coordinate.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}
