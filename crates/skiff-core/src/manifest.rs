//! Per-runtime dependency manifest parsing.
//!
//! Each runtime declares how its manifest's raw bytes become a flat list of
//! dependency identifiers. A missing manifest is a valid zero-dependency
//! project, not an error; a manifest that exists but has the wrong shape is
//! [`RuntimeError::MalformedManifest`].

use crate::error::{RuntimeError, RuntimeResult};
use crate::runtime::Runtime;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Typed shape of the parts of `package.json` skiff cares about.
///
/// Decoding fails (and surfaces as `MalformedManifest`) when
/// `dependencies` is present but not a flat string-to-string map.
#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    dependencies: Option<BTreeMap<String, String>>,
}

/// Read and parse the dependency manifest for a runtime.
///
/// Returns the declared dependency identifiers: one per non-blank line for
/// Python's `requirements.txt`, and `name@version` entries for Node's
/// `package.json`. A missing manifest yields an empty list.
pub async fn read_manifest(root: &Path, runtime: Runtime) -> RuntimeResult<Vec<String>> {
    let path = root.join(runtime.manifest_file());

    let bytes = match fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(%runtime, path = %path.display(), "No manifest, zero dependencies");
            return Ok(Vec::new());
        }
        Err(e) => return Err(RuntimeError::io(path.display().to_string(), e)),
    };

    match runtime {
        Runtime::Python => Ok(parse_requirements(&bytes)),
        Runtime::Node => parse_package_json(&path, &bytes),
    }
}

/// `requirements.txt`: one identifier per line, blank lines and `#`
/// comments skipped.
fn parse_requirements(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// `package.json`: entries of the `dependencies` map flattened into
/// `name@version` identifiers.
fn parse_package_json(path: &Path, bytes: &[u8]) -> RuntimeResult<Vec<String>> {
    let manifest: PackageManifest = serde_json::from_slice(bytes)
        .map_err(|e| RuntimeError::malformed(path.display().to_string(), e.to_string()))?;

    Ok(manifest
        .dependencies
        .unwrap_or_default()
        .into_iter()
        .map(|(name, version)| format!("{name}@{version}"))
        .collect())
}
