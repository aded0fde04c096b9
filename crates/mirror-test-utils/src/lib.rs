//! Shared test utilities for the mirror workspace.
//!
//! This crate is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] fixture holding a source and a replica directory
//!   plus helpers to snapshot and compare them

pub mod tree;

pub use tree::{Node, TestTree, snapshot};
