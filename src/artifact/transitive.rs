//! Transitive dependency resolution.
//!
//! [`GraphResolver`] walks the declared dependencies of each direct
//! dependency breadth-first, asking a [`MetadataSource`] for the published
//! descriptor of every coordinate it reaches. There is no version
//! mediation: the first version seen for a `(group, artifact)` pair is
//! pinned and later sightings of other versions are skipped, with their
//! edges redirected to the pinned coordinate. A cycle anywhere in the walk
//! is an error.

use crate::artifact::Artifact;
use crate::artifact::graph::DependencyGraph;
use crate::core::Coordinate;
use crate::core::error::StrataError;
use crate::descriptor::DependencyDecl;
use crate::repository::Repository;
use crate::store::LocalStore;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Supplies the declared dependencies of a published artifact.
///
/// The engine's builder implements this against its own descriptor cache
/// and repository locator, so a coordinate looked up once stays available
/// to the rest of the session.
pub trait MetadataSource {
    /// The dependencies `coordinate` declares, interpolated and with
    /// defaults applied. Identical whether the descriptor is served from
    /// the session cache or built fresh.
    fn dependencies_of(
        &self,
        coordinate: &Coordinate,
        repositories: &[Repository],
        store: &LocalStore,
    ) -> Result<Vec<DependencyDecl>, StrataError>;
}

/// Expands a direct dependency set into the full resolved artifact set.
pub trait TransitiveResolver {
    /// Resolve `direct` and everything it reaches.
    ///
    /// Returns the full set, direct dependencies included, ordered so every
    /// artifact precedes the artifacts that depend on it.
    fn resolve(
        &self,
        direct: &[DependencyDecl],
        repositories: &[Repository],
        store: &LocalStore,
        metadata: &dyn MetadataSource,
    ) -> Result<Vec<Artifact>, StrataError>;
}

/// Breadth-first resolver with first-seen version pinning.
#[derive(Debug, Default)]
pub struct GraphResolver;

impl GraphResolver {
    /// Create a resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Mutable state threaded through one resolution walk.
#[derive(Default)]
struct Walk {
    /// Winning declaration per `(group, artifact)` pair.
    winners: HashMap<(String, String), DependencyDecl>,
    graph: DependencyGraph,
    queue: VecDeque<Coordinate>,
}

impl Walk {
    /// Record one declared dependency, pinning its version if the pair is
    /// new and redirecting the edge to the pinned coordinate otherwise.
    fn admit(&mut self, decl: &DependencyDecl, dependent: Option<&Coordinate>) {
        let key = decl.key();
        if let Some(winner) = self.winners.get(&key) {
            let pinned = winner.coordinate();
            if pinned.version != decl.version {
                debug!(
                    kept = %pinned,
                    skipped = %decl.coordinate(),
                    "version already pinned for this artifact, keeping first-seen"
                );
            }
            if let Some(from) = dependent {
                self.graph.add_dependency(from.clone(), pinned);
            }
        } else {
            let coordinate = decl.coordinate();
            self.graph.ensure_node(coordinate.clone());
            if let Some(from) = dependent {
                self.graph.add_dependency(from.clone(), coordinate.clone());
            }
            self.queue.push_back(coordinate);
            self.winners.insert(key, decl.clone());
        }
    }
}

impl TransitiveResolver for GraphResolver {
    fn resolve(
        &self,
        direct: &[DependencyDecl],
        repositories: &[Repository],
        store: &LocalStore,
        metadata: &dyn MetadataSource,
    ) -> Result<Vec<Artifact>, StrataError> {
        let mut walk = Walk::default();

        for decl in direct {
            walk.admit(decl, None);
        }

        while let Some(current) = walk.queue.pop_front() {
            for decl in metadata.dependencies_of(&current, repositories, store)? {
                walk.admit(&decl, Some(&current));
            }
        }

        let order = walk.graph.topological_order()?;
        debug!(direct = direct.len(), resolved = order.len(), "transitive walk complete");

        // Every graph node is a winner, so the lookup cannot miss.
        let mut by_coordinate: HashMap<Coordinate, DependencyDecl> =
            walk.winners.into_values().map(|decl| (decl.coordinate(), decl)).collect();

        let mut artifacts = Vec::with_capacity(order.len());
        for coordinate in order {
            if let Some(decl) = by_coordinate.remove(&coordinate) {
                artifacts.push(Artifact::from_dependency(&decl, store));
            }
        }
        Ok(artifacts)
    }
}
