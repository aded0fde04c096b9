//! Core of the directory mirror
//!
//! - [`sync`]: one recursive pass that makes a replica tree match a source tree
//! - [`schedule`]: runs passes at a fixed period until cancelled
//! - [`settings`]: validated runtime settings shared by the binary

pub mod error;
pub mod schedule;
pub mod settings;
pub mod sync;

pub use error::{Error, Result};
pub use schedule::{RunSummary, Scheduler, SchedulerState, run_periodically};
pub use settings::{MirrorSettings, PartialSettings};
pub use sync::{SyncReport, synchronize};
