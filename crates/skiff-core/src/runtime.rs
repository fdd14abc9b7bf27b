//! Runtime detection.
//!
//! A project's runtime is inferred from a recognized entrypoint filename
//! found anywhere in the (non-hidden) tree. The entrypoint and manifest
//! tables are fixed at compile time; adding a runtime means adding an enum
//! variant and its two table entries.

use crate::error::{RuntimeError, RuntimeResult};
use crate::walk::walk_files;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// A supported language runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Python,
    Node,
}

impl Runtime {
    /// Map an entrypoint filename to its runtime.
    pub fn from_entrypoint(file_name: &str) -> Option<Self> {
        match file_name {
            "main.py" => Some(Self::Python),
            "index.js" => Some(Self::Node),
            _ => None,
        }
    }

    /// The entrypoint filename that identifies this runtime.
    pub fn entrypoint(&self) -> &'static str {
        match self {
            Self::Python => "main.py",
            Self::Node => "index.js",
        }
    }

    /// The dependency manifest filename for this runtime, relative to the
    /// project root.
    pub fn manifest_file(&self) -> &'static str {
        match self {
            Self::Python => "requirements.txt",
            Self::Node => "package.json",
        }
    }

    /// Canonical lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Node => "node",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Detect the project's runtime from entrypoint files in the tree.
///
/// Exactly one runtime's entrypoint is expected. Multiple entrypoints of
/// the *same* runtime (say, nested `main.py` files) are fine; entrypoints
/// of distinct runtimes fail with [`RuntimeError::AmbiguousRuntime`], and a
/// tree with none fails with [`RuntimeError::UnsupportedRuntime`].
pub fn resolve_runtime(root: &Path) -> RuntimeResult<Runtime> {
    let mut detected: Option<Runtime> = None;

    for file in walk_files(root).map_err(RuntimeError::State)? {
        let base_name = file.rel_path.rsplit('/').next().unwrap_or(&file.rel_path);
        let Some(runtime) = Runtime::from_entrypoint(base_name) else {
            continue;
        };

        match detected {
            None => {
                debug!(%runtime, entrypoint = base_name, "Detected runtime");
                detected = Some(runtime);
            }
            Some(previous) if previous != runtime => {
                return Err(RuntimeError::AmbiguousRuntime(
                    previous.entrypoint().to_string(),
                    runtime.entrypoint().to_string(),
                ));
            }
            Some(_) => {}
        }
    }

    detected.ok_or_else(|| RuntimeError::UnsupportedRuntime(root.display().to_string()))
}
