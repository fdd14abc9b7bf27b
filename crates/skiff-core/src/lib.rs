//! State tracking and change detection for incremental deploys.
//!
//! This crate tracks the filesystem state of a project across deploys and
//! computes minimal deltas instead of re-uploading whole trees:
//!
//! - A content-addressed snapshot of the tree (path -> SHA-256 fingerprint)
//!   persisted under a reserved `.skiff/` directory
//! - File change detection: which files changed, were added or deleted
//!   since the last committed snapshot
//! - Dependency change detection: which declared dependency identifiers
//!   were added or removed since the last commit, parsed from the detected
//!   runtime's manifest
//!
//! Detection never writes. The deploy orchestrator acts on the deltas and
//! then commits the new baseline explicitly:
//!
//! ```no_run
//! use skiff_core::{ChangeDetector, DepDiffer, StateStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StateStore::new("/path/to/project").await?;
//!
//! let changes = ChangeDetector::new(&store).compute_changes().await?;
//! let dep_changes = DepDiffer::new(&store).compute_dep_changes().await?;
//!
//! // ... upload changes.changes, delete changes.deletions remotely ...
//!
//! let snapshot = ChangeDetector::new(&store).scan().await?;
//! store.save_snapshot(&snapshot).await?;
//! # Ok(())
//! # }
//! ```

mod changes;
mod deps;
mod error;
mod hash;
mod manifest;
mod runtime;
mod snapshot;
mod store;
mod walk;

pub use changes::ChangeDetector;
pub use deps::{DepChanges, DepDiffer};
pub use error::{RuntimeError, RuntimeResult, StateError, StateResult};
pub use hash::Fingerprint;
pub use manifest::read_manifest;
pub use runtime::{resolve_runtime, Runtime};
pub use snapshot::{FileSnapshot, ProgramInfo, StateChanges};
pub use store::{StateStore, STATE_DIR};
pub use walk::{walk_files, WalkedFile};
