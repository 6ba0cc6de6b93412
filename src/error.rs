//! Error types for the state store

use std::path::PathBuf;

/// Errors reported by [`crate::state::StateStore`].
///
/// `Unavailable` is structural: the data directory cannot host the
/// write-temp-then-rename protocol at all. Every other variant describes a
/// single failed operation after which the canonical file is still intact.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The data directory is missing, not creatable, or not writable.
    #[error("state directory {} is unavailable: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the canonical file failed for a reason other than absence.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be serialized.
    #[error("failed to serialize state document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Creating, writing, or syncing the temporary file failed.
    #[error("failed to write temporary file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Replacing the canonical file with the temporary file failed.
    #[error("failed to move {} into place: {source}", .path.display())]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store was sealed for shutdown and accepts no more writes.
    #[error("state store is sealed for shutdown")]
    Sealed,
}

impl StoreError {
    /// Whether this error means the store can never work in its directory.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, StoreError>;
