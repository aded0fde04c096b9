//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in mirror-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source entry in a comparison pair is neither a file nor a directory
    #[error("Unsupported entry kind at {path}")]
    UnsupportedEntry { path: PathBuf },

    /// A synchronization root is missing or is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A required setting was not supplied
    #[error("Missing setting: {name}")]
    MissingSetting { name: &'static str },

    /// A configured path does not exist
    #[error("{name} does not exist: {path}")]
    PathNotFound { name: &'static str, path: PathBuf },

    /// The period between passes is not positive
    #[error("Period must be greater than 0, got {value}")]
    InvalidPeriod { value: i64 },

    /// The blocking task running a pass did not complete
    #[error("Synchronization pass aborted: {0}")]
    PassAborted(#[from] tokio::task::JoinError),

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}
