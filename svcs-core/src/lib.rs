//! SVCS core library.
//!
//! A minimal local version-control store. Every named repository lives in
//! its own directory under a single root and has a working set of files
//! plus an append-only list of immutable commit snapshots.
//!
//! # Architecture
//!
//! - `types`: configuration, commit metadata and errors
//! - `helpers`: on-disk layout, locking, copying and the history index
//! - [`RepositoryStore`]: repository lifecycle and working-set files
//! - [`CommitEngine`]: snapshots and history queries
//!
//! The library never prints; diagnostics go through the `log` facade.

pub mod helpers;
pub mod types;

mod engine;
mod store;

pub use engine::{CommitEngine, MIN_PREFIX_LEN};
pub use store::{validate_name, RepoHandle, RepositoryStore};
pub use types::{CommitId, CommitInfo, Config, ErrorKind, Result, SvcsError};

/// Version string including the build commit, when known.
pub const VERSION: &str = env!("SVCS_VERSION_STRING");
