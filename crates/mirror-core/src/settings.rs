//! Runtime settings
//!
//! Settings arrive in pieces (a config file, then command-line overrides) as
//! [`PartialSettings`], and are checked once into [`MirrorSettings`] before
//! the scheduler starts.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

/// Possibly incomplete settings, as read from a config file or arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialSettings {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
    /// Seconds to wait after a pass before starting the next one
    pub period_secs: Option<i64>,
    pub log_file: Option<PathBuf>,
}

impl PartialSettings {
    /// Layer `overrides` on top of `self`; values present in `overrides` win.
    pub fn merge(self, overrides: PartialSettings) -> PartialSettings {
        PartialSettings {
            source: overrides.source.or(self.source),
            replica: overrides.replica.or(self.replica),
            period_secs: overrides.period_secs.or(self.period_secs),
            log_file: overrides.log_file.or(self.log_file),
        }
    }

    /// Require every setting and validate the result.
    ///
    /// # Errors
    ///
    /// [`Error::MissingSetting`] for the first absent value, then whatever
    /// [`MirrorSettings::validate`] reports.
    pub fn resolve(self) -> Result<MirrorSettings> {
        let source = self.source.ok_or(Error::MissingSetting { name: "source" })?;
        let replica = self.replica.ok_or(Error::MissingSetting { name: "replica" })?;
        let period_secs = self
            .period_secs
            .ok_or(Error::MissingSetting { name: "period" })?;
        let log_file = self
            .log_file
            .ok_or(Error::MissingSetting { name: "log_file" })?;

        let settings = MirrorSettings {
            source,
            replica,
            period: Duration::from_secs(u64::try_from(period_secs).unwrap_or(0)),
            log_file,
        };
        // A negative period collapses to zero above; report what was given.
        settings.validate().map_err(|e| match e {
            Error::InvalidPeriod { .. } => Error::InvalidPeriod { value: period_secs },
            other => other,
        })?;
        Ok(settings)
    }
}

/// Complete settings for one mirror process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorSettings {
    pub source: PathBuf,
    pub replica: PathBuf,
    pub period: Duration,
    pub log_file: PathBuf,
}

impl MirrorSettings {
    /// Check that the paths exist and the period is usable.
    ///
    /// Checks run in order: source, replica, log file, period.
    ///
    /// # Errors
    ///
    /// [`Error::PathNotFound`] or [`Error::NotADirectory`] for the first
    /// unusable path, [`Error::InvalidPeriod`] for a zero period.
    pub fn validate(&self) -> Result<()> {
        require_dir("source", &self.source)?;
        require_dir("replica", &self.replica)?;
        if !self.log_file.exists() {
            return Err(Error::PathNotFound {
                name: "log file",
                path: self.log_file.clone(),
            });
        }
        if self.period.is_zero() {
            return Err(Error::InvalidPeriod { value: 0 });
        }
        Ok(())
    }
}

fn require_dir(name: &'static str, path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::PathNotFound {
            name,
            path: path.to_path_buf(),
        });
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
