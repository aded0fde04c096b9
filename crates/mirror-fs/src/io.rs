//! Filesystem operations that attach the offending path to every error

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::{EntryKind, Error, Result};

/// List the entry names of a directory.
///
/// Names are returned in a sorted set so traversal order is stable and
/// membership checks are exact (no case folding or normalization).
pub fn list_names(dir: &Path) -> Result<BTreeSet<OsString>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut names = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        names.insert(entry.file_name());
    }
    Ok(names)
}

/// Copy `source` over `destination`, replacing any existing content.
///
/// The destination is truncated and rewritten in place. Returns the number
/// of bytes copied.
pub fn copy_file(source: &Path, destination: &Path) -> Result<u64> {
    fs::copy(source, destination).map_err(|e| {
        // Blame whichever side is actually missing.
        if e.kind() == std::io::ErrorKind::NotFound && !source.exists() {
            Error::io(source, e)
        } else {
            Error::io(destination, e)
        }
    })
}

/// Create a single empty directory.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| Error::io(path, e))
}

/// Remove a replica entry: directories with all descendants, anything else
/// as a single directory entry.
pub fn remove_entry(path: &Path, kind: EntryKind) -> Result<()> {
    match kind {
        EntryKind::Directory => fs::remove_dir_all(path),
        EntryKind::File | EntryKind::Other => fs::remove_file(path),
    }
    .map_err(|e| Error::io(path, e))
}
