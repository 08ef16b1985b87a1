//! Append-only commit history index.
//!
//! `history.jsonl` holds one [`HistoryRecord`] per line in creation order.
//! It is the source of truth for `log` ordering; commit directories are
//! never enumerated for ordering when they are indexed here.

use std::io::{BufRead, BufReader, Write};

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::helpers::layout::RepoLayout;
use crate::types::{timestamp, CommitId, CommitInfo, Result};

/// A single line of the history index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Commit identifier.
    pub id: CommitId,

    /// Commit creation instant.
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl From<&CommitInfo> for HistoryRecord {
    fn from(info: &CommitInfo) -> Self {
        Self {
            id: info.id.clone(),
            timestamp: info.timestamp,
        }
    }
}

/// History index of one repository.
pub struct History<'a> {
    layout: &'a RepoLayout,
}

impl<'a> History<'a> {
    /// Create a history index handle.
    pub fn new(layout: &'a RepoLayout) -> Self {
        Self { layout }
    }

    /// Append a record to the index.
    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.layout.history_path())?;
        writeln!(file, "{}", line)?;
        file.sync_data()?;
        Ok(())
    }

    /// Read all records, oldest first.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        let path = self.layout.history_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&path)?;
        let reader = BufReader::new(file);
        let mut records: Vec<HistoryRecord> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                // A torn final line from an interrupted append.
                Err(e) => log::warn!(
                    "Skipping malformed history line in {}: {}",
                    path.display(),
                    e
                ),
            }
        }

        Ok(records)
    }

    /// Drop the record for `id`, rewriting the index.
    ///
    /// Only used to roll back a commit whose publication failed halfway.
    pub fn remove(&self, id: &CommitId) -> Result<()> {
        let kept: Vec<HistoryRecord> = self
            .read_all()?
            .into_iter()
            .filter(|record| &record.id != id)
            .collect();

        let mut contents = String::new();
        for record in &kept {
            contents.push_str(&serde_json::to_string(record)?);
            contents.push('\n');
        }
        fs::write(self.layout.history_path(), contents)?;
        Ok(())
    }
}
