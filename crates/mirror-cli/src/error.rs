//! Error types for mirror-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit code for invalid invocations
pub const INVALID_INVOCATION: i32 = -1;

/// Exit code for failures after the arguments were accepted
pub const RUNTIME_FAILURE: i32 = 1;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from mirror-core
    #[error(transparent)]
    Core(#[from] mirror_core::Error),

    /// Error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The log sink could not be installed
    #[error("Failed to initialize logging: {message}")]
    Logging { message: String },
}

impl CliError {
    pub fn logging(message: impl ToString) -> Self {
        Self::Logging {
            message: message.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(
                mirror_core::Error::MissingSetting { .. }
                | mirror_core::Error::PathNotFound { .. }
                | mirror_core::Error::InvalidPeriod { .. }
                | mirror_core::Error::NotADirectory { .. },
            )
            | Self::Fs(_) => INVALID_INVOCATION,
            _ => RUNTIME_FAILURE,
        }
    }
}
