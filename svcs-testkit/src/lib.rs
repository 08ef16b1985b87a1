//! SVCS Test Kit.
//!
//! Helpers shared by the integration tests of the SVCS crates.
//!
//! # Key Types
//!
//! - [`TestRoot`]: a temporary store root plus a directory for source files
//! - [`TreeSnapshot`]: captures a directory tree (files and bytes) for comparison
//! - [`TreeDiff`]: the differences between two captures
//!
//! # Example
//!
//! ```no_run
//! use svcs_testkit::{TestRoot, TreeSnapshot};
//!
//! let root = TestRoot::new().unwrap();
//! root.store().initialize("proj").unwrap();
//! let notes = root.write_source("notes.txt", b"hello").unwrap();
//! root.store().add_file("proj", &notes).unwrap();
//!
//! let before = TreeSnapshot::capture(root.root()).unwrap();
//! ```

mod diff;
mod repo;
mod snapshot;

pub use diff::{Mismatch, TreeDiff};
pub use repo::{TestRoot, TestRootError};
pub use snapshot::TreeSnapshot;

/// Re-export svcs_core for convenience in tests.
pub use svcs_core;
