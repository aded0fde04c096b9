//! One-way recursive synchronization
//!
//! A pass walks the source tree level by level and mutates the replica in
//! place until both trees hold the same names, the same directory structure
//! and files with equal content fingerprints. Replica entries with no source
//! counterpart are purged.
//!
//! Any error aborts the whole pass. Work done before the failure is kept;
//! the next pass picks up from whatever state the replica is in.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use mirror_fs::{EntryKind, Fingerprint, io};

use crate::{Error, Result};

/// Counters describing what a pass changed in the replica.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Directories created in the replica
    pub dirs_created: u64,
    /// Files copied into the replica because they were missing
    pub files_copied: u64,
    /// Replica files overwritten because their fingerprint differed
    pub files_updated: u64,
    /// File pairs whose fingerprints already matched
    pub files_unchanged: u64,
    /// Replica directories removed along with their descendants
    pub dirs_deleted: u64,
    /// Replica files (or other non-directory entries) removed
    pub files_deleted: u64,
}

impl SyncReport {
    /// Number of mutations applied to the replica.
    pub fn changes(&self) -> u64 {
        self.dirs_created
            + self.files_copied
            + self.files_updated
            + self.dirs_deleted
            + self.files_deleted
    }

    /// Whether the pass left the replica untouched.
    pub fn is_noop(&self) -> bool {
        self.changes() == 0
    }
}

/// Make `replica` a mirror of `source`.
///
/// Both roots must already exist as directories. The source tree is only
/// read; every mutation happens under `replica`.
///
/// # Errors
///
/// Returns [`Error::NotADirectory`] if a root is unusable,
/// [`Error::UnsupportedEntry`] if a source entry paired with a replica entry
/// is neither a file nor a directory, and [`Error::Fs`] for any I/O failure.
pub fn synchronize(source: &Path, replica: &Path) -> Result<SyncReport> {
    ensure_directory(source)?;
    ensure_directory(replica)?;

    let mut report = SyncReport::default();
    sync_directory(source, replica, &mut report)?;
    Ok(report)
}

fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(Error::NotADirectory {
            path: path.to_path_buf(),
        })
    }
}

fn sync_directory(source: &Path, replica: &Path, report: &mut SyncReport) -> Result<()> {
    debug!(source = %source.display(), replica = %replica.display(), "Synchronizing directory");

    let source_names = io::list_names(source)?;
    let replica_names = io::list_names(replica)?;

    for name in &source_names {
        let source_path = source.join(name);
        let replica_path = replica.join(name);
        let source_kind = EntryKind::of_source(&source_path)?;

        if replica_names.contains(name) {
            reconcile_pair(&source_path, &replica_path, source_kind, report)?;
        } else {
            add_entry(&source_path, &replica_path, source_kind, report)?;
        }
    }

    // The listings above are stale once entries were added or replaced.
    let source_names = io::list_names(source)?;
    let replica_names = io::list_names(replica)?;

    for name in replica_names.difference(&source_names) {
        let replica_path = replica.join(name);
        let kind = EntryKind::of_replica(&replica_path)?;
        io::remove_entry(&replica_path, kind)?;
        match kind {
            EntryKind::Directory => {
                report.dirs_deleted += 1;
                info!(path = %replica_path.display(), "Deleted folder");
            }
            EntryKind::File | EntryKind::Other => {
                report.files_deleted += 1;
                info!(path = %replica_path.display(), "Removed file");
            }
        }
    }

    Ok(())
}

/// Handle a name present on both sides.
fn reconcile_pair(
    source_path: &Path,
    replica_path: &Path,
    source_kind: EntryKind,
    report: &mut SyncReport,
) -> Result<()> {
    if source_kind == EntryKind::Other {
        return Err(Error::UnsupportedEntry {
            path: source_path.to_path_buf(),
        });
    }

    let replica_kind = EntryKind::of_replica(replica_path)?;
    match (source_kind, replica_kind) {
        (EntryKind::Directory, EntryKind::Directory) => {
            sync_directory(source_path, replica_path, report)
        }
        (EntryKind::File, EntryKind::File) => {
            let source_fp = Fingerprint::of_file(source_path)?;
            let replica_fp = Fingerprint::of_file(replica_path)?;
            if source_fp == replica_fp {
                report.files_unchanged += 1;
                return Ok(());
            }
            io::copy_file(source_path, replica_path)?;
            report.files_updated += 1;
            info!(
                path = %replica_path.display(),
                from = %replica_fp,
                to = %source_fp,
                "Synchronized file"
            );
            Ok(())
        }
        _ => {
            info!(
                path = %replica_path.display(),
                source_kind = %source_kind,
                replica_kind = %replica_kind,
                "Replacing replica entry of a different kind"
            );
            io::remove_entry(replica_path, replica_kind)?;
            match replica_kind {
                EntryKind::Directory => report.dirs_deleted += 1,
                EntryKind::File | EntryKind::Other => report.files_deleted += 1,
            }
            add_entry(source_path, replica_path, source_kind, report)
        }
    }
}

/// Handle a name present only in the source.
fn add_entry(
    source_path: &Path,
    replica_path: &Path,
    source_kind: EntryKind,
    report: &mut SyncReport,
) -> Result<()> {
    match source_kind {
        EntryKind::Directory => {
            io::create_dir(replica_path)?;
            report.dirs_created += 1;
            info!(path = %replica_path.display(), "New folder created");
            sync_directory(source_path, replica_path, report)
        }
        EntryKind::File => {
            io::copy_file(source_path, replica_path)?;
            report.files_copied += 1;
            info!(path = %replica_path.display(), "Added new file");
            Ok(())
        }
        EntryKind::Other => {
            warn!(
                path = %source_path.display(),
                "Skipping source entry that is neither a file nor a directory"
            );
            Ok(())
        }
    }
}
