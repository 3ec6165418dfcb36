//! Inheritance folding: merging a descriptor against its resolved ancestor.
//!
//! Folding is a pure function over the lineage. Each level is merged against
//! the already-merged result of its ancestor, starting from the built-in
//! super defaults, strictly root to leaf. Reordering the walk breaks field
//! precedence, so callers hand over the lineage already ordered.
//!
//! # Field rules
//!
//! | Field        | Rule                                                |
//! |--------------|-----------------------------------------------------|
//! | group        | child wins; inherited when unset                    |
//! | artifact     | never inherited                                     |
//! | version      | child wins; inherited when unset                    |
//! | parent       | never inherited (describes the child's own link)    |
//! | layout dirs  | per-field: child wins; inherited when unset         |
//! | properties   | union; child wins on key collision                  |
//! | dependencies | union keyed by (group, artifact); child entry wins  |
//! | repositories | union keyed by id; child entry wins                 |
//!
//! Collection unions keep the child's entries first, in declaration order,
//! followed by ancestor entries the child does not redefine.

use crate::descriptor::Descriptor;
use std::collections::HashSet;

/// Merge one descriptor against its ancestor's already-resolved model.
///
/// Both inputs are borrowed untouched; the effective descriptor is a new
/// value. Idempotent and deterministic for a given pair.
#[must_use]
pub fn merge_inherit(child: &Descriptor, parent: &Descriptor) -> Descriptor {
    let mut effective = Descriptor::new();

    effective.project.group = pick(&child.project.group, &parent.project.group);
    // The artifact names the module itself and never flows down.
    effective.project.artifact = child.project.artifact.clone();
    effective.project.version = pick(&child.project.version, &parent.project.version);

    effective.parent = child.parent.clone();

    effective.layout.source_dir = pick(&child.layout.source_dir, &parent.layout.source_dir);
    effective.layout.test_source_dir =
        pick(&child.layout.test_source_dir, &parent.layout.test_source_dir);
    effective.layout.script_source_dir =
        pick(&child.layout.script_source_dir, &parent.layout.script_source_dir);

    effective.properties = parent.properties.clone();
    effective.properties.extend(child.properties.clone());

    effective.dependencies = child.dependencies.clone();
    let declared: HashSet<_> = child.dependencies.iter().map(|d| d.key()).collect();
    for dependency in &parent.dependencies {
        if !declared.contains(&dependency.key()) {
            effective.dependencies.push(dependency.clone());
        }
    }

    effective.repositories = child.repositories.clone();
    let declared: HashSet<_> = child.repositories.iter().map(|r| r.id.clone()).collect();
    for repository in &parent.repositories {
        if !declared.contains(&repository.id) {
            effective.repositories.push(repository.clone());
        }
    }

    effective
}

/// Fold an ordered lineage into one effective descriptor per level.
///
/// `raw_lineage` must be ordered root first, requested leaf last. Level 0 is
/// merged against `super_defaults`, each following level against the
/// previous result. The returned vector parallels the input; its last
/// element is the leaf's effective descriptor.
#[must_use]
pub fn fold_lineage(raw_lineage: &[Descriptor], super_defaults: &Descriptor) -> Vec<Descriptor> {
    let mut effectives = Vec::with_capacity(raw_lineage.len());
    let mut previous = super_defaults.clone();

    for raw in raw_lineage {
        let current = merge_inherit(raw, &previous);
        effectives.push(current.clone());
        previous = current;
    }

    effectives
}

fn pick(child: &Option<String>, parent: &Option<String>) -> Option<String> {
    child.clone().or_else(|| parent.clone())
}
