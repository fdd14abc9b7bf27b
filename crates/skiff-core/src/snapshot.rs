//! Snapshot and change-set data structures.

use crate::hash::Fingerprint;
use crate::runtime::Runtime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The last known committed state of a project tree: one fingerprint per
/// non-hidden regular file, keyed by root-relative path.
///
/// Snapshots are replaced wholesale on every commit; there is no partial
/// merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileSnapshot(BTreeMap<String, Fingerprint>);

impl FileSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fingerprint for a path.
    pub fn insert(&mut self, path: impl Into<String>, fingerprint: Fingerprint) {
        self.0.insert(path.into(), fingerprint);
    }

    /// Get the stored fingerprint for a path.
    pub fn get(&self, path: &str) -> Option<&Fingerprint> {
        self.0.get(path)
    }

    /// Iterate over all recorded paths.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of recorded files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the snapshot records no files.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Fingerprint)> for FileSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Fingerprint)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The delta between the current tree and the stored snapshot.
///
/// Computed fresh on every call and never persisted. `changes` carries the
/// full bytes of every file that is new or whose fingerprint differs;
/// `deletions` lists paths present in the snapshot but gone from disk.
#[derive(Debug, Clone, Default)]
pub struct StateChanges {
    /// Changed or added files, path -> full content.
    pub changes: HashMap<String, Vec<u8>>,
    /// Paths deleted since the snapshot. Order is not meaningful.
    pub deletions: Vec<String>,
}

impl StateChanges {
    /// Whether the tree matches the snapshot exactly.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.deletions.is_empty()
    }

    /// Total bytes across all changed files.
    pub fn changed_bytes(&self) -> u64 {
        self.changes.values().map(|c| c.len() as u64).sum()
    }
}

/// Persisted per-project metadata: the detected runtime and the dependency
/// list as of the last commit.
///
/// Absence of this record means "first run", not an error. `runtime` is
/// `None` when detection has not happened yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    /// Detected runtime, if any.
    #[serde(default)]
    pub runtime: Option<Runtime>,
    /// Dependency identifiers as of the last commit. Order is irrelevant
    /// for comparison.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ProgramInfo {
    /// Create program info for a detected runtime and its dependencies.
    pub fn new(runtime: Runtime, dependencies: Vec<String>) -> Self {
        Self {
            runtime: Some(runtime),
            dependencies,
        }
    }
}
