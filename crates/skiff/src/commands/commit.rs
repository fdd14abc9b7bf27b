//! `skiff commit` - persist the current tree and dependency baseline.

use anyhow::Result;
use skiff_core::{ChangeDetector, DepDiffer, ProgramInfo, RuntimeError, StateStore};
use std::path::Path;
use tracing::info;

/// Scan the tree and save it as the new snapshot, then resolve the runtime
/// and save the manifest's dependency list as the new program info.
///
/// This is the explicit baseline commit the detectors compare against; a
/// deploy orchestrator runs it only after acting on the deltas.
pub async fn run(root: &Path) -> Result<()> {
    let store = StateStore::new(root).await?;

    let snapshot = ChangeDetector::new(&store).scan().await?;
    store.save_snapshot(&snapshot).await?;
    println!("Committed snapshot of {} files.", snapshot.len());

    match DepDiffer::new(&store).current().await {
        Ok((runtime, deps)) => {
            let count = deps.len();
            store.save_program_info(&ProgramInfo::new(runtime, deps)).await?;
            println!("Committed {runtime} baseline with {count} dependencies.");
        }
        Err(RuntimeError::UnsupportedRuntime(_)) => {
            // a tree without a recognized entrypoint can still be tracked
            info!("No supported runtime detected, skipping dependency baseline");
            println!("No supported runtime detected; dependency baseline skipped.");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
