//! SHA-256 content fingerprints
//!
//! Files are hashed by streaming their bytes in fixed-size blocks, so memory
//! use does not depend on file size. Fingerprints render in the canonical
//! `sha256:<hex>` form.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all rendered fingerprints
const PREFIX: &str = "sha256:";

/// Number of bytes read per hashing step
pub const BLOCK_SIZE: usize = 4096;

/// Digest of a file's full byte stream.
///
/// Two files with equal fingerprints are treated as having identical content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint of in-memory content.
    pub fn of_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }

    /// Fingerprint of everything readable from `reader`, consumed in
    /// [`BLOCK_SIZE`] chunks.
    pub fn of_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut block = [0u8; BLOCK_SIZE];
        loop {
            let read = match reader.read(&mut block) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&block[..read]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    /// Fingerprint of a file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn of_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::of_reader(file).map_err(|e| Error::io(path, e))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PREFIX)?;
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
