//! Materialized dependency artifacts.
//!
//! Finishing turns each declared dependency into an [`Artifact`]: the
//! coordinate plus resolved kind and scope, bound to the path the store
//! would hold its payload at. Materialization is pure construction and
//! never touches the network; whether the payload actually exists at that
//! path is a question for whoever consumes the project model.

pub mod graph;
pub mod transitive;

use crate::core::Coordinate;
use crate::descriptor::DependencyDecl;
use crate::store::LocalStore;
use std::fmt;
use std::path::PathBuf;

/// One dependency of a project, resolved to concrete kind and scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Identity of the dependency.
    pub coordinate: Coordinate,
    /// Artifact kind, `lib` unless declared otherwise.
    pub kind: String,
    /// Resolution scope, `compile` unless declared otherwise.
    pub scope: String,
    /// Where the store holds (or would hold) the payload.
    pub path: PathBuf,
}

impl Artifact {
    /// Materialize one declared dependency against a store.
    #[must_use]
    pub fn from_dependency(decl: &DependencyDecl, store: &LocalStore) -> Self {
        let coordinate = decl.coordinate();
        let kind = decl.kind_or_default().to_string();
        let path = store.artifact_path(&coordinate, &kind);
        Self {
            coordinate,
            kind,
            scope: decl.scope_or_default().to_string(),
            path,
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.coordinate, self.kind, self.scope)
    }
}

/// Materialize every declared dependency of a resolved model.
///
/// Order follows the declaration order of the effective descriptor.
#[must_use]
pub fn materialize(dependencies: &[DependencyDecl], store: &LocalStore) -> Vec<Artifact> {
    dependencies.iter().map(|decl| Artifact::from_dependency(decl, store)).collect()
}
