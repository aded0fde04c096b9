//! Log sink: timestamped records appended to the configured log file

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Install the global subscriber writing to `log_file`.
///
/// The file must already exist; records are appended. `RUST_LOG` overrides
/// the default level, which is `info`, or `debug` when `verbose` is set.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    let file = OpenOptions::new()
        .append(true)
        .open(log_file)
        .map_err(|e| mirror_fs::Error::io(log_file, e))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(CliError::logging)?;

    tracing::subscriber::set_global_default(subscriber(file, filter)).map_err(CliError::logging)
}

/// Build a subscriber that formats records into `file`.
pub fn subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer)
}
