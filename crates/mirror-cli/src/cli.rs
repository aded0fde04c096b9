//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;
use mirror_core::PartialSettings;

/// Periodically mirror a source directory onto a replica directory
///
/// Every PERIOD seconds the replica is made identical to the source: new and
/// changed files are copied, and anything not present in the source is
/// deleted from the replica. Stop with Ctrl+C; the pass in progress finishes
/// first.
///
/// Examples:
///   mirror ./data /backup/data 60 ./mirror.log
///   mirror --config mirror.toml
///   mirror --config mirror.toml ./other-source
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, allow_negative_numbers = true)]
pub struct Cli {
    /// Directory to copy from
    pub source: Option<PathBuf>,

    /// Directory made identical to SOURCE
    pub replica: Option<PathBuf>,

    /// Seconds to wait between passes
    pub period: Option<i64>,

    /// Existing file that log records are appended to
    pub log_file: Option<PathBuf>,

    /// TOML, JSON or YAML file supplying any of the settings above
    ///
    /// Keys: source, replica, period_secs, log_file. Positional arguments
    /// take precedence.
    #[arg(short, long, env = "MIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug-level log records
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Settings given directly on the command line.
    pub fn overrides(&self) -> PartialSettings {
        PartialSettings {
            source: self.source.clone(),
            replica: self.replica.clone(),
            period_secs: self.period,
            log_file: self.log_file.clone(),
        }
    }
}
