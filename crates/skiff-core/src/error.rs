//! Error types for the state and dependency engines.

use thiserror::Error;

/// Result type for snapshot and change-detection operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors from the snapshot store, tree walker and change detector.
#[derive(Debug, Error)]
pub enum StateError {
    /// No snapshot has been written yet. Callers treat this as "first run".
    #[error("no snapshot recorded under {0}")]
    NotFound(String),

    /// Filesystem access failed. Fatal to the current operation.
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Persisted state exists but does not parse.
    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StateError {
    /// Attach a path to an io error.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wrap a parse failure of a persisted artifact.
    pub fn corrupt(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }
}

/// Result type for runtime resolution and dependency diffing.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Errors from runtime detection, manifest parsing and dependency diffing.
///
/// These are independent of [`StateError`]: a failed dependency diff never
/// invalidates a file-change diff computed for the same root.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Entrypoints of more than one runtime were found in the tree.
    #[error("conflicting entrypoint files: found both {0} and {1}")]
    AmbiguousRuntime(String, String),

    /// No recognized entrypoint file anywhere under the root.
    #[error("no supported runtime found in {0}")]
    UnsupportedRuntime(String),

    /// The manifest exists but does not match the expected shape.
    #[error("malformed manifest {path}: {reason}")]
    MalformedManifest { path: String, reason: String },

    /// Filesystem access failed while reading the manifest or walking.
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored program info could not be loaded.
    #[error(transparent)]
    State(#[from] StateError),
}

impl RuntimeError {
    /// Attach a path to an io error.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed-manifest error.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
