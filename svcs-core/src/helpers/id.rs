//! Commit id and staging name generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::types::CommitId;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

/// Derive a commit id from a creation instant.
///
/// The instant is combined with the process id and a process-wide counter, so
/// two calls never produce the same id within one process even when the clock
/// does not advance between them.
pub fn commit_id(at: DateTime<Utc>) -> CommitId {
    let seed = format!(
        "{}:{}:{}",
        at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        std::process::id(),
        next_sequence()
    );
    CommitId::new(blake3::hash(seed.as_bytes()).to_hex().to_string())
}

/// Unique name for a staging entry, e.g. `init-proj-1234-7`.
pub fn staging_name(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, std::process::id(), next_sequence())
}

/// Recover `<owner>` from a name built as `staging_name("<kind>-<owner>")`.
pub fn staging_owner<'a>(entry: &'a str, kind: &str) -> Option<&'a str> {
    let rest = entry.strip_prefix(kind)?.strip_prefix('-')?;
    let mut parts = rest.rsplitn(3, '-');
    let seq = parts.next()?;
    let pid = parts.next()?;
    let owner = parts.next()?;
    let numeric = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    (numeric(seq) && numeric(pid)).then_some(owner)
}
