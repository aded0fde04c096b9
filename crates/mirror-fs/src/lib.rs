//! Filesystem primitives for the directory mirror
//!
//! Provides content fingerprints, entry classification, path-aware I/O
//! helpers and format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod entry;
pub mod error;
pub mod io;

pub use checksum::Fingerprint;
pub use config::ConfigStore;
pub use entry::EntryKind;
pub use error::{Error, Result};
