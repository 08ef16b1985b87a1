//! SVCS error types.
//!
//! Every fallible operation in the core returns [`SvcsError`]. Callers that
//! only care about the category can use [`SvcsError::kind`], whose
//! [`ErrorKind::error_type`] strings are stable and safe to match on from
//! scripts or JSON consumers.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the core.
pub type Result<T> = std::result::Result<T, SvcsError>;

/// Category of an [`SvcsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Repository was never initialized.
    NotFound,
    /// Repository already exists.
    AlreadyExists,
    /// Source file for an add could not be read.
    SourceUnavailable,
    /// Repository name is not usable as a directory segment.
    InvalidName,
    /// Repository directory is missing one of its areas.
    Corrupted,
    /// No commit matches the given id or prefix.
    CommitNotFound,
    /// More than one commit matches the given prefix.
    AmbiguousCommit,
    /// The requested file is not part of a commit's snapshot.
    FileNotInSnapshot,
    /// Repository lock could not be acquired in time.
    LockTimeout,
    /// Configuration problem.
    Config,
    /// I/O error.
    Io,
    /// JSON or TOML (de)serialization error.
    Serialization,
}

impl ErrorKind {
    /// Get the error type as a stable string.
    pub fn error_type(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::SourceUnavailable => "source_unavailable",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::Corrupted => "corrupted",
            ErrorKind::CommitNotFound => "commit_not_found",
            ErrorKind::AmbiguousCommit => "ambiguous_commit",
            ErrorKind::FileNotInSnapshot => "file_not_in_snapshot",
            ErrorKind::LockTimeout => "lock_timeout",
            ErrorKind::Config => "config_error",
            ErrorKind::Io => "io_error",
            ErrorKind::Serialization => "serialization_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_type())
    }
}

/// Main error type for SVCS operations.
#[derive(Debug, Error)]
pub enum SvcsError {
    #[error("Repository '{name}' does not exist.")]
    NotFound { name: String },

    #[error("Repository '{name}' already exists.")]
    AlreadyExists { name: String },

    #[error("cannot read source file {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid repository name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("repository '{name}' is corrupted: {detail}")]
    Corrupted { name: String, detail: String },

    #[error("commit '{commit}' not found in repository '{name}'")]
    CommitNotFound { name: String, commit: String },

    #[error("commit prefix '{prefix}' is ambiguous in repository '{name}' ({matches} matches)")]
    AmbiguousCommit {
        name: String,
        prefix: String,
        matches: usize,
    },

    #[error("file '{file}' is not part of commit '{commit}'")]
    FileNotInSnapshot { commit: String, file: String },

    #[error("timed out waiting for lock {}", path.display())]
    LockTimeout { path: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl SvcsError {
    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SvcsError::NotFound { .. } => ErrorKind::NotFound,
            SvcsError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            SvcsError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            SvcsError::InvalidName { .. } => ErrorKind::InvalidName,
            SvcsError::Corrupted { .. } => ErrorKind::Corrupted,
            SvcsError::CommitNotFound { .. } => ErrorKind::CommitNotFound,
            SvcsError::AmbiguousCommit { .. } => ErrorKind::AmbiguousCommit,
            SvcsError::FileNotInSnapshot { .. } => ErrorKind::FileNotInSnapshot,
            SvcsError::LockTimeout { .. } => ErrorKind::LockTimeout,
            SvcsError::Config { .. } => ErrorKind::Config,
            SvcsError::Io(_) => ErrorKind::Io,
            SvcsError::Json(_) | SvcsError::TomlDe(_) | SvcsError::TomlSer(_) => {
                ErrorKind::Serialization
            }
        }
    }

    /// Get the error type as a stable string.
    pub fn error_type(&self) -> &'static str {
        self.kind().error_type()
    }

    // Convenience constructors

    /// Create a "not found" error for a repository.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an "already exists" error for a repository.
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    /// Create a "source unavailable" error.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create an "invalid name" error.
    pub fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason,
        }
    }

    /// Create a "corrupted" error.
    pub fn corrupted(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Corrupted {
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// Create a "commit not found" error.
    pub fn commit_not_found(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self::CommitNotFound {
            name: name.into(),
            commit: commit.into(),
        }
    }

    /// Create a "config" error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is an AlreadyExists error.
    pub fn is_already_exists(&self) -> bool {
        self.kind() == ErrorKind::AlreadyExists
    }

    /// Check if this is a SourceUnavailable error.
    pub fn is_source_unavailable(&self) -> bool {
        self.kind() == ErrorKind::SourceUnavailable
    }
}
