//! Dependency change detection.

use crate::error::{RuntimeError, RuntimeResult};
use crate::manifest::read_manifest;
use crate::runtime::{resolve_runtime, Runtime};
use crate::store::StateStore;
use std::collections::HashSet;
use tracing::debug;

/// The delta between the manifest's dependency identifiers and the list
/// stored at the last commit. Ephemeral, computed fresh on every call.
///
/// Identifiers compare by exact string equality, so a version bump shows
/// up as one removal plus one addition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepChanges {
    /// Identifiers in the manifest but not in the stored list.
    pub added: Vec<String>,
    /// Identifiers in the stored list but no longer in the manifest.
    pub removed: Vec<String>,
}

impl DepChanges {
    /// Whether the declared dependencies match the stored baseline.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Detects dependency changes for a project since the last committed
/// program info.
pub struct DepDiffer<'a> {
    store: &'a StateStore,
}

impl<'a> DepDiffer<'a> {
    /// Create a differ over a project's state store.
    pub fn new(store: &'a StateStore) -> Self {
        Self { store }
    }

    /// Compute the dependency delta against the stored program info.
    ///
    /// With no stored info, or with an empty stored dependency list, every
    /// identifier in the manifest counts as an addition. Detection never
    /// writes; committing the new baseline is the caller's explicit
    /// [`StateStore::save_program_info`] step, fed by [`current`].
    ///
    /// [`current`]: DepDiffer::current
    pub async fn compute_dep_changes(&self) -> RuntimeResult<DepChanges> {
        let info = self.store.load_program_info().await?;
        let runtime = self.effective_runtime(info.as_ref().and_then(|i| i.runtime))?;
        let current = read_manifest(self.store.root(), runtime).await?;

        let stored = info.map(|i| i.dependencies).unwrap_or_default();
        if stored.is_empty() {
            debug!(%runtime, added = current.len(), "No stored dependencies, all current count as added");
            return Ok(DepChanges {
                added: current,
                removed: Vec::new(),
            });
        }

        // every stored identifier is a removal candidate until seen in the
        // manifest
        let mut removed: HashSet<&str> = stored.iter().map(String::as_str).collect();
        let mut added = Vec::new();

        for dep in &current {
            if !removed.remove(dep.as_str()) {
                added.push(dep.clone());
            }
        }

        let mut removed: Vec<String> = removed.into_iter().map(String::from).collect();
        removed.sort();

        debug!(%runtime, added = added.len(), removed = removed.len(), "Computed dependency changes");
        Ok(DepChanges { added, removed })
    }

    /// The resolved runtime and the manifest's current identifiers.
    ///
    /// This is what the caller persists via
    /// [`StateStore::save_program_info`] once it has acted on the delta.
    pub async fn current(&self) -> RuntimeResult<(Runtime, Vec<String>)> {
        let info = self.store.load_program_info().await?;
        let runtime = self.effective_runtime(info.and_then(|i| i.runtime))?;
        let deps = read_manifest(self.store.root(), runtime).await?;
        Ok((runtime, deps))
    }

    /// Use the recorded runtime when there is one, otherwise detect fresh.
    fn effective_runtime(&self, stored: Option<Runtime>) -> RuntimeResult<Runtime> {
        match stored {
            Some(runtime) => Ok(runtime),
            None => resolve_runtime(self.store.root()),
        }
    }
}
