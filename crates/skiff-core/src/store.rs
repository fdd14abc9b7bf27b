//! Persistence for snapshots and program info.
//!
//! Everything skiff persists lives under a reserved `.skiff/` directory at
//! the project root:
//!
//! ```text
//! .skiff/
//!   state.json      # FileSnapshot: { "<path>": "<hex fingerprint>", ... }
//!   program.json    # ProgramInfo: { "runtime": ..., "dependencies": [...] }
//! ```
//!
//! The directory is dot-prefixed, so the tree walker never descends into
//! it. The store is the only component that touches these files.

use crate::error::{StateError, StateResult};
use crate::snapshot::{FileSnapshot, ProgramInfo};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Name of the reserved state directory under the project root.
pub const STATE_DIR: &str = ".skiff";

const SNAPSHOT_FILE: &str = "state.json";
const PROGRAM_INFO_FILE: &str = "program.json";

/// Store for a single project's persisted snapshot and program info.
///
/// Scoped to exactly one project root; there is no cross-project sharing.
/// A single writer per root is assumed (concurrent writers from multiple
/// processes are the caller's problem to serialize).
pub struct StateStore {
    root: PathBuf,
    state_dir: PathBuf,
    snapshot_path: PathBuf,
    program_info_path: PathBuf,
}

impl StateStore {
    /// Open the store for a project root, creating `.skiff/` if needed.
    pub async fn new(root: impl Into<PathBuf>) -> StateResult<Self> {
        let root = root.into();
        let state_dir = root.join(STATE_DIR);

        fs::create_dir_all(&state_dir)
            .await
            .map_err(|e| StateError::io(state_dir.display().to_string(), e))?;

        Ok(Self {
            snapshot_path: state_dir.join(SNAPSHOT_FILE),
            program_info_path: state_dir.join(PROGRAM_INFO_FILE),
            state_dir,
            root,
        })
    }

    /// The project root this store is scoped to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The reserved state directory.
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Load the last committed snapshot.
    ///
    /// Fails with [`StateError::NotFound`] when no snapshot has ever been
    /// written; callers treat that as "first run". Fails with
    /// [`StateError::Corrupt`] when the file exists but does not parse.
    pub async fn load_snapshot(&self) -> StateResult<FileSnapshot> {
        match self.read_json::<FileSnapshot>(&self.snapshot_path).await? {
            Some(snapshot) => {
                debug!(files = snapshot.len(), "Loaded snapshot");
                Ok(snapshot)
            }
            None => Err(StateError::NotFound(self.root.display().to_string())),
        }
    }

    /// Replace the persisted snapshot wholesale.
    pub async fn save_snapshot(&self, snapshot: &FileSnapshot) -> StateResult<()> {
        self.write_json(&self.snapshot_path, snapshot).await?;
        info!(files = snapshot.len(), "Saved snapshot");
        Ok(())
    }

    /// Load the persisted program info, if any.
    ///
    /// `None` means the record has never been written (first run) and is
    /// not an error.
    pub async fn load_program_info(&self) -> StateResult<Option<ProgramInfo>> {
        self.read_json(&self.program_info_path).await
    }

    /// Replace the persisted program info.
    pub async fn save_program_info(&self, info: &ProgramInfo) -> StateResult<()> {
        self.write_json(&self.program_info_path, info).await?;
        info!(
            runtime = ?info.runtime,
            dependencies = info.dependencies.len(),
            "Saved program info"
        );
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> StateResult<Option<T>> {
        match fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| StateError::corrupt(path.display().to_string(), e))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::io(path.display().to_string(), e)),
        }
    }

    /// Write atomically from a concurrent reader's perspective: serialize
    /// to a temp file in the same directory, then rename over the target.
    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> StateResult<()> {
        let content = serde_json::to_vec_pretty(value)
            .map_err(|e| StateError::corrupt(path.display().to_string(), e))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, &content)
            .await
            .map_err(|e| StateError::io(tmp_path.display().to_string(), e))?;
        fs::rename(&tmp_path, path)
            .await
            .map_err(|e| StateError::io(path.display().to_string(), e))?;

        debug!(path = %path.display(), bytes = content.len(), "Wrote state file");
        Ok(())
    }
}
