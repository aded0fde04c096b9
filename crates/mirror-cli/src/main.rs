//! Periodic directory mirror
//!
//! Validates the invocation, installs the log sink, then runs the scheduler
//! until Ctrl+C, waiting for the pass in flight before exiting.

mod cli;
mod error;
mod logging;

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use cli::Cli;
use error::{INVALID_INVOCATION, Result};
use mirror_core::{MirrorSettings, PartialSettings, Scheduler};
use mirror_fs::ConfigStore;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(INVALID_INVOCATION);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    logging::init(&settings.log_file, cli.verbose)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mirror(settings))
}

/// Merge the optional config file with command-line values and validate.
fn resolve_settings(cli: &Cli) -> Result<MirrorSettings> {
    let base = match &cli.config {
        Some(path) => ConfigStore::new().load::<PartialSettings>(path)?,
        None => PartialSettings::default(),
    };
    Ok(base.merge(cli.overrides()).resolve()?)
}

async fn mirror(settings: MirrorSettings) -> Result<()> {
    let cancel = CancellationToken::new();
    let scheduler = Scheduler::new(
        settings.period,
        settings.source.clone(),
        settings.replica.clone(),
        cancel.clone(),
    )?;

    info!(
        source = %settings.source.display(),
        replica = %settings.replica.display(),
        period_secs = settings.period.as_secs(),
        "Starting scheduler"
    );
    let mut handle = scheduler.spawn();

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Interrupt received, stopping scheduler");
            cancel.cancel();
            let summary = handle.await.map_err(mirror_core::Error::from)?;
            info!(
                passes = summary.passes,
                failed_passes = summary.failed_passes,
                "Shutdown complete"
            );
            Ok(())
        }
        joined = &mut handle => {
            // Only a panic inside the scheduler task ends the loop uncancelled.
            let summary = joined.map_err(|e| {
                error!(error = %e, "Scheduler exited unexpectedly");
                mirror_core::Error::from(e)
            })?;
            info!(passes = summary.passes, "Scheduler stopped");
            Ok(())
        }
    }
}
