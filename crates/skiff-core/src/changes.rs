//! File change detection against the stored snapshot.

use crate::error::{StateError, StateResult};
use crate::hash::Fingerprint;
use crate::snapshot::{FileSnapshot, StateChanges};
use crate::store::StateStore;
use crate::walk::walk_files;
use std::collections::HashSet;
use tokio::fs;
use tracing::debug;

/// Detects which files changed, were added or deleted since the last
/// committed snapshot.
///
/// Detection is a pure comparison between the disk state and the stored
/// snapshot; it never writes. Committing a new baseline is the caller's
/// explicit step via [`StateStore::save_snapshot`], fed by [`scan`].
///
/// [`scan`]: ChangeDetector::scan
pub struct ChangeDetector<'a> {
    store: &'a StateStore,
}

impl<'a> ChangeDetector<'a> {
    /// Create a detector over a project's state store.
    pub fn new(store: &'a StateStore) -> Self {
        Self { store }
    }

    /// Compute the delta between the current tree and the stored snapshot.
    ///
    /// With no stored snapshot (first run) every file in the tree counts as
    /// added and the deletion set is empty. Comparison is purely by content
    /// fingerprint; a rewrite with identical bytes is not a change.
    ///
    /// All-or-nothing: any unreadable file or directory aborts the whole
    /// computation.
    pub async fn compute_changes(&self) -> StateResult<StateChanges> {
        let previous = match self.store.load_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(StateError::NotFound(_)) => {
                debug!("No stored snapshot, treating whole tree as added");
                return self.read_all().await;
            }
            Err(e) => return Err(e),
        };

        // every stored path is a deletion candidate until seen on disk
        let mut deletions: HashSet<String> = previous.paths().map(String::from).collect();
        let mut changes = StateChanges::default();

        for file in walk_files(self.store.root())? {
            deletions.remove(&file.rel_path);

            let contents = read_file(&file.abs_path).await?;
            let fingerprint = Fingerprint::of_bytes(&contents);

            if previous.get(&file.rel_path) != Some(&fingerprint) {
                changes.changes.insert(file.rel_path, contents);
            }
        }

        changes.deletions = deletions.into_iter().collect();
        debug!(
            changed = changes.changes.len(),
            deleted = changes.deletions.len(),
            "Computed state changes"
        );
        Ok(changes)
    }

    /// Fingerprint the current tree without touching persisted state.
    ///
    /// The result is what the caller passes to
    /// [`StateStore::save_snapshot`] once it has acted on the changes.
    pub async fn scan(&self) -> StateResult<FileSnapshot> {
        let mut snapshot = FileSnapshot::new();
        for file in walk_files(self.store.root())? {
            let contents = read_file(&file.abs_path).await?;
            snapshot.insert(file.rel_path, Fingerprint::of_bytes(&contents));
        }
        Ok(snapshot)
    }

    /// First-run path: return every file's contents as an addition.
    async fn read_all(&self) -> StateResult<StateChanges> {
        let mut changes = StateChanges::default();
        for file in walk_files(self.store.root())? {
            let contents = read_file(&file.abs_path).await?;
            changes.changes.insert(file.rel_path, contents);
        }
        Ok(changes)
    }
}

async fn read_file(path: &std::path::Path) -> StateResult<Vec<u8>> {
    fs::read(path)
        .await
        .map_err(|e| StateError::io(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    async fn store_for(root: &Path) -> StateStore {
        StateStore::new(root).await.unwrap()
    }

    fn changed_paths(changes: &StateChanges) -> std::collections::BTreeSet<String> {
        changes.changes.keys().cloned().collect()
    }

    #[tokio::test]
    async fn empty_root_without_snapshot_is_empty_delta() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_for(dir.path()).await;

        let changes = ChangeDetector::new(&store).compute_changes().await.unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn first_run_returns_whole_tree_as_added() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.py"), b"print('hi')").unwrap();
        std::fs::create_dir(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/util.py"), b"pass").unwrap();

        let store = store_for(dir.path()).await;
        let changes = ChangeDetector::new(&store).compute_changes().await.unwrap();

        let expected: std::collections::BTreeSet<String> =
            ["main.py", "lib/util.py"].into_iter().map(String::from).collect();
        assert_eq!(changed_paths(&changes), expected);
        assert_eq!(changes.changes["main.py"], b"print('hi')");
        assert!(changes.deletions.is_empty());
    }

    #[tokio::test]
    async fn first_run_does_not_persist_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), b"a").unwrap();

        let store = store_for(dir.path()).await;
        ChangeDetector::new(&store).compute_changes().await.unwrap();

        // read-only operation: still "first run" afterwards
        assert!(matches!(
            store.load_snapshot().await,
            Err(StateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn clean_tree_after_commit_has_empty_delta() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), b"a").unwrap();
        std::fs::write(dir.path().join("b.py"), b"b").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);
        store.save_snapshot(&detector.scan().await.unwrap()).await.unwrap();

        let changes = detector.compute_changes().await.unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn modified_and_new_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), b"version 1").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);
        store.save_snapshot(&detector.scan().await.unwrap()).await.unwrap();

        std::fs::write(dir.path().join("a.py"), b"version 2").unwrap();
        std::fs::write(dir.path().join("b.py"), b"brand new").unwrap();

        let changes = detector.compute_changes().await.unwrap();
        let expected: std::collections::BTreeSet<String> =
            ["a.py", "b.py"].into_iter().map(String::from).collect();
        assert_eq!(changed_paths(&changes), expected);
        assert_eq!(changes.changes["a.py"], b"version 2");
        assert_eq!(changes.changes["b.py"], b"brand new");
        assert!(changes.deletions.is_empty());
    }

    #[tokio::test]
    async fn deleted_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), b"keep").unwrap();
        std::fs::write(dir.path().join("b.py"), b"remove").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);
        store.save_snapshot(&detector.scan().await.unwrap()).await.unwrap();

        std::fs::remove_file(dir.path().join("b.py")).unwrap();

        let changes = detector.compute_changes().await.unwrap();
        assert!(changes.changes.is_empty());
        assert_eq!(changes.deletions, vec!["b.py".to_string()]);
    }

    #[tokio::test]
    async fn touch_without_content_change_is_not_a_change() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), b"same bytes").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);
        store.save_snapshot(&detector.scan().await.unwrap()).await.unwrap();

        // rewrite identical content, bumping mtime
        std::fs::write(dir.path().join("a.py"), b"same bytes").unwrap();

        let changes = detector.compute_changes().await.unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn detection_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), b"one").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);
        store.save_snapshot(&detector.scan().await.unwrap()).await.unwrap();

        std::fs::write(dir.path().join("a.py"), b"two").unwrap();
        std::fs::remove_file(dir.path().join("a.py")).unwrap();
        std::fs::write(dir.path().join("b.py"), b"new").unwrap();

        let first = detector.compute_changes().await.unwrap();
        let second = detector.compute_changes().await.unwrap();

        assert_eq!(changed_paths(&first), changed_paths(&second));
        let mut d1 = first.deletions.clone();
        let mut d2 = second.deletions.clone();
        d1.sort();
        d2.sort();
        assert_eq!(d1, d2);
    }

    #[tokio::test]
    async fn every_path_lands_in_exactly_one_partition() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("unchanged.py"), b"stable").unwrap();
        std::fs::write(dir.path().join("modified.py"), b"before").unwrap();
        std::fs::write(dir.path().join("deleted.py"), b"doomed").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);
        store.save_snapshot(&detector.scan().await.unwrap()).await.unwrap();

        std::fs::write(dir.path().join("modified.py"), b"after").unwrap();
        std::fs::remove_file(dir.path().join("deleted.py")).unwrap();
        std::fs::write(dir.path().join("added.py"), b"fresh").unwrap();

        let changes = detector.compute_changes().await.unwrap();
        let changed = changed_paths(&changes);
        let deleted: std::collections::BTreeSet<_> =
            changes.deletions.iter().cloned().collect();

        assert!(changed.contains("modified.py"));
        assert!(changed.contains("added.py"));
        assert!(deleted.contains("deleted.py"));
        assert!(!changed.contains("unchanged.py"));
        assert!(!deleted.contains("unchanged.py"));
        // disjoint
        assert!(changed.is_disjoint(&deleted));
    }

    #[tokio::test]
    async fn hidden_files_never_surface() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("visible.py"), b"v").unwrap();
        std::fs::create_dir(dir.path().join(".cache")).unwrap();
        std::fs::write(dir.path().join(".cache/data"), b"before").unwrap();

        let store = store_for(dir.path()).await;
        let detector = ChangeDetector::new(&store);

        let snap = detector.scan().await.unwrap();
        assert!(snap.get(".cache/data").is_none());
        store.save_snapshot(&snap).await.unwrap();

        // content change under a hidden dir must stay invisible
        std::fs::write(dir.path().join(".cache/data"), b"after").unwrap();

        let changes = detector.compute_changes().await.unwrap();
        assert!(changes.is_empty());
    }
}
