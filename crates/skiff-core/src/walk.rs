//! Project tree walking with hidden-path exclusion.
//!
//! The walker enumerates every non-hidden regular file under a root. A path
//! is hidden when its base name starts with `.`; hidden directories are
//! pruned wholesale, so nothing beneath them is ever visited. This is also
//! what keeps the walker out of the reserved `.skiff/` state directory.
//!
//! Traversal order is not guaranteed; consumers must key results by path.

use crate::error::{StateError, StateResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A regular file found during a walk.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Path relative to the walk root, `/`-separated.
    pub rel_path: String,
    /// Absolute path on disk.
    pub abs_path: PathBuf,
}

/// Check whether a directory entry is hidden (base name starts with `.`).
///
/// Applied uniformly on all platforms.
fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Convert a path under `root` into a `/`-separated relative string.
fn rel_path_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Enumerate all non-hidden regular files under `root`.
///
/// Aborts with [`StateError::Io`] if any directory cannot be read; no
/// partial results are surfaced.
pub fn walk_files(root: &Path) -> StateResult<Vec<WalkedFile>> {
    let mut files = Vec::new();

    // depth 0 is the root itself, which may legitimately be dot-prefixed
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| root.display().to_string());
            match e.into_io_error() {
                Some(io) => StateError::io(path, io),
                None => StateError::io(
                    root.display().to_string(),
                    std::io::Error::other("walk loop detected"),
                ),
            }
        })?;

        if entry.file_type().is_file() {
            files.push(WalkedFile {
                rel_path: rel_path_string(root, entry.path()),
                abs_path: entry.path().to_path_buf(),
            });
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    fn rel_set(files: &[WalkedFile]) -> BTreeSet<String> {
        files.iter().map(|f| f.rel_path.clone()).collect()
    }

    #[test]
    fn walks_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "a").unwrap();
        fs::create_dir_all(dir.path().join("src/deep")).unwrap();
        fs::write(dir.path().join("src/deep/b.py"), "b").unwrap();

        let files = walk_files(dir.path()).unwrap();
        let expected: BTreeSet<String> =
            ["a.py", "src/deep/b.py"].into_iter().map(String::from).collect();
        assert_eq!(rel_set(&files), expected);
    }

    #[test]
    fn skips_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("visible.txt"), "v").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();

        let files = walk_files(dir.path()).unwrap();
        assert_eq!(rel_set(&files), BTreeSet::from(["visible.txt".to_string()]));
    }

    #[test]
    fn prunes_hidden_directory_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".git/objects/abc"), "blob").unwrap();
        fs::create_dir_all(dir.path().join(".skiff")).unwrap();
        fs::write(dir.path().join(".skiff/state.json"), "{}").unwrap();
        fs::write(dir.path().join("main.py"), "print()").unwrap();

        let files = walk_files(dir.path()).unwrap();
        assert_eq!(rel_set(&files), BTreeSet::from(["main.py".to_string()]));
    }

    #[test]
    fn hidden_root_is_still_walkable() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join(".project");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("file.txt"), "x").unwrap();

        let files = walk_files(&root).unwrap();
        assert_eq!(rel_set(&files), BTreeSet::from(["file.txt".to_string()]));
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("nope");
        let err = walk_files(&gone).unwrap_err();
        assert!(matches!(err, StateError::Io { .. }));
    }
}
