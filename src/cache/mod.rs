//! Session-scoped coordinate cache for raw descriptors.
//!
//! One [`DescriptorCache`] lives inside each [`crate::builder::ProjectBuilder`]
//! and dies with it; nothing is ever persisted. During lineage assembly the
//! cache is consulted before the repository locator, so a coordinate that was
//! already read in this session is reused without touching the filesystem or
//! the network.
//!
//! # Write policy
//!
//! Every lineage level is recorded under its effective coordinate exactly
//! once per session ([`DescriptorCache::insert_if_absent`]), except the
//! top-level requested descriptor, which always overwrites
//! ([`DescriptorCache::insert`]): it was freshly read and is the
//! authoritative copy if the same coordinate turns up later as someone
//! else's ancestor. Rebuilding a coordinate within one session is
//! last-write-wins.
//!
//! # Concurrency
//!
//! Backed by [`DashMap`], so a builder shared across threads (a parallel
//! multi-module build) gets atomic per-coordinate reads and writes without
//! any external locking discipline.

use crate::core::Coordinate;
use crate::descriptor::Descriptor;
use dashmap::DashMap;

/// Maps [`Coordinate`] to the raw [`Descriptor`] read for it.
///
/// Keys match by exact component equality; no normalization is applied, so
/// `1.0` and `1.0.0` are distinct entries.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: DashMap<Coordinate, Descriptor>,
}

impl DescriptorCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the raw descriptor cached for `coordinate`.
    ///
    /// Returns a clone; descriptors are immutable once read, so callers can
    /// hold the value without blocking other sessions.
    #[must_use]
    pub fn get(&self, coordinate: &Coordinate) -> Option<Descriptor> {
        self.entries.get(coordinate).map(|entry| entry.value().clone())
    }

    /// Record `descriptor` under `coordinate`, replacing any existing entry.
    ///
    /// Used for the top-level requested descriptor, whose fresh read always
    /// supersedes whatever the session held before.
    pub fn insert(&self, coordinate: Coordinate, descriptor: Descriptor) {
        self.entries.insert(coordinate, descriptor);
    }

    /// Record `descriptor` under `coordinate` unless the session already
    /// holds one.
    ///
    /// The entry call is atomic per coordinate, so two threads racing on the
    /// same ancestor agree on a single winner.
    pub fn insert_if_absent(&self, coordinate: Coordinate, descriptor: Descriptor) {
        self.entries.entry(coordinate).or_insert(descriptor);
    }

    /// Number of cached coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
