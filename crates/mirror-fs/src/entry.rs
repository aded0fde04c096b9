//! Directory entry classification

use std::fs;
use std::path::Path;

use crate::{Error, Result};

/// The kind of an observed directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file
    File,
    /// A directory
    Directory,
    /// Anything else: sockets, FIFOs, device nodes, broken symlinks
    Other,
}

impl EntryKind {
    /// Classify an entry of the source tree.
    ///
    /// Symlinks are followed, so a link to a file is a file and a link to a
    /// directory is a directory. A link whose target is missing is `Other`.
    pub fn of_source(path: &Path) -> Result<Self> {
        match fs::metadata(path) {
            Ok(meta) => Ok(Self::from_file_type(meta.file_type())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The name was listed, so a dangling link is the only way
                // `metadata` can miss it while `symlink_metadata` sees it.
                match fs::symlink_metadata(path) {
                    Ok(_) => Ok(Self::Other),
                    Err(_) => Err(Error::io(path, e)),
                }
            }
            Err(e) => Err(Error::io(path, e)),
        }
    }

    /// Classify an entry of the replica tree without following symlinks.
    pub fn of_replica(path: &Path) -> Result<Self> {
        let meta = fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_file_type(meta.file_type()))
    }

    fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }

    /// Human-readable label used in log events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
