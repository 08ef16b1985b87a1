//! Commit metadata types.
//!
//! A commit on disk is a directory `commits/<id>/` holding a `files/` snapshot
//! and an `info.json` record deserialized into [`CommitInfo`].

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Unique identifier of a commit (lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display: the first [`CommitId::SHORT_LEN`] characters.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(Self::SHORT_LEN)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }

    /// Whether this id starts with the given prefix.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Length of [`CommitId::short`].
    pub const SHORT_LEN: usize = 8;
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata persisted as `info.json` next to a commit's snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit identifier, equal to the commit directory name.
    pub id: CommitId,

    /// Caller supplied message (may be empty).
    pub message: String,

    /// Creation instant.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// Create commit metadata.
    pub fn new(id: CommitId, message: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            message: message.into(),
            timestamp,
        }
    }

    /// Load metadata from an `info.json` file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Save metadata as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Timestamp as written to disk.
    pub fn timestamp_string(&self) -> String {
        timestamp::format(&self.timestamp)
    }

    /// Get the default metadata file name.
    pub const fn info_filename() -> &'static str {
        "info.json"
    }
}

/// Timestamp (de)serialization.
///
/// Writes RFC 3339 in UTC. Reads RFC 3339 or a naive ISO-8601 timestamp,
/// which is interpreted in the local time zone.
pub(crate) mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(ts))
    }

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        let naive = NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT).ok()?;
        let local = Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(|| naive.and_utc());
        Some(local)
    }
}
