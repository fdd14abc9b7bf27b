//! `skiff status` - show pending file and dependency changes.

use super::format_size;
use anyhow::Result;
use serde_json::json;
use skiff_core::{ChangeDetector, DepChanges, DepDiffer, RuntimeError, StateStore};
use std::path::Path;
use tracing::debug;

/// Compute and print both deltas. Never writes.
///
/// A dependency-resolution failure is reported but does not suppress the
/// file delta; the two detectors are independent.
pub async fn run(root: &Path, json: bool) -> Result<()> {
    let store = StateStore::new(root).await?;

    let changes = ChangeDetector::new(&store).compute_changes().await?;
    let dep_result = DepDiffer::new(&store).compute_dep_changes().await;
    debug!(root = %root.display(), "Computed status");

    if json {
        print_json(&changes, &dep_result);
        return Ok(());
    }

    let mut changed: Vec<_> = changes.changes.iter().collect();
    changed.sort_by(|a, b| a.0.cmp(b.0));
    let mut deleted = changes.deletions.clone();
    deleted.sort();

    if changes.is_empty() {
        println!("No file changes.");
    } else {
        println!(
            "Files: {} changed, {} deleted ({})",
            changed.len(),
            deleted.len(),
            format_size(changes.changed_bytes())
        );
        for (path, contents) in changed {
            println!("  + {path} ({})", format_size(contents.len() as u64));
        }
        for path in &deleted {
            println!("  - {path}");
        }
    }

    match dep_result {
        Ok(deps) if deps.is_empty() => println!("No dependency changes."),
        Ok(deps) => {
            println!(
                "Dependencies: {} added, {} removed",
                deps.added.len(),
                deps.removed.len()
            );
            for dep in &deps.added {
                println!("  + {dep}");
            }
            for dep in &deps.removed {
                println!("  - {dep}");
            }
        }
        Err(e) => println!("Dependency check failed: {e}"),
    }

    Ok(())
}

fn print_json(changes: &skiff_core::StateChanges, deps: &Result<DepChanges, RuntimeError>) {
    let mut changed: Vec<_> = changes
        .changes
        .iter()
        .map(|(path, contents)| json!({ "path": path, "size": contents.len() }))
        .collect();
    changed.sort_by_key(|v| v["path"].as_str().map(String::from));
    let mut deleted = changes.deletions.clone();
    deleted.sort();

    let deps_value = match deps {
        Ok(d) => json!({ "added": d.added, "removed": d.removed }),
        Err(e) => json!({ "error": e.to_string() }),
    };

    let output = json!({
        "files": { "changed": changed, "deleted": deleted },
        "dependencies": deps_value,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}
