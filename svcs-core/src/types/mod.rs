//! Core type definitions for SVCS.

mod commit;
mod config;
mod error;

pub use commit::{CommitId, CommitInfo};
pub(crate) use commit::timestamp;
pub use config::{Config, DEFAULT_ROOT_DIR_NAME, ROOT_ENV_VAR};
pub use error::{ErrorKind, Result, SvcsError};
