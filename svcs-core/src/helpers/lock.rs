//! Exclusive lock files.
//!
//! A lock is a file created with `create_new` that holds the owner's pid. A
//! process killed while holding a lock never runs `Drop`, so a lock whose
//! owner is gone is broken and taken over. When the owner cannot be
//! determined, a lock older than [`STALE_AFTER`] counts as abandoned.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use fs_err as fs;

use crate::helpers::id::staging_name;
use crate::types::{Result, SvcsError};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Age after which a lock without a checkable owner is considered abandoned.
pub const STALE_AFTER: Duration = Duration::from_secs(10 * 60);

/// A held lock; the lock file is removed on drop.
#[derive(Debug)]
pub struct FileLock(PathBuf);

impl FileLock {
    /// Acquire the lock at `lock_path`, polling until `timeout` elapses.
    ///
    /// A lock left behind by a dead process is removed and retried.
    pub fn acquire(lock_path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let deadline = Instant::now() + timeout;
        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(lock_path)
            {
                Ok(mut file) => {
                    // Dropped on a failed write, which removes the file again.
                    let lock = Self(lock_path.to_path_buf());
                    writeln!(file, "{}", std::process::id())?;
                    file.sync_data()?;
                    log::debug!("Acquired lock {}", lock_path.display());
                    return Ok(lock);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if is_stale(lock_path) {
                        break_lock(lock_path)?;
                        continue;
                    }
                    if Instant::now() >= deadline {
                        return Err(SvcsError::LockTimeout {
                            path: lock_path.to_path_buf(),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

/// Owner pid recorded in a lock file, if readable.
fn owner_pid(lock_path: &Path) -> Option<u32> {
    std::fs::read_to_string(lock_path).ok()?.trim().parse().ok()
}

/// Whether the lock at `lock_path` was left behind by a process that is gone.
fn is_stale(lock_path: &Path) -> bool {
    if let Some(pid) = owner_pid(lock_path) {
        if let Some(dead) = owner_is_dead(pid) {
            return dead;
        }
    }
    // Unknown owner: either a lock still being written or a foreign one.
    lock_age(lock_path).is_some_and(|age| age >= STALE_AFTER)
}

fn lock_age(lock_path: &Path) -> Option<Duration> {
    let modified = std::fs::metadata(lock_path).ok()?.modified().ok()?;
    SystemTime::now().duration_since(modified).ok()
}

/// `Some(true)` if no process with `pid` exists, `None` if that cannot be told.
#[cfg(unix)]
fn owner_is_dead(pid: u32) -> Option<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let pid = Pid::from_raw(i32::try_from(pid).ok()?);
    match kill(pid, None) {
        Ok(()) => Some(false),
        Err(Errno::ESRCH) => Some(true),
        Err(Errno::EPERM) => Some(false),
        Err(err) => {
            log::debug!("kill({}, 0) failed: {}", pid, err);
            None
        }
    }
}

#[cfg(not(unix))]
fn owner_is_dead(_pid: u32) -> Option<bool> {
    None
}

/// Move a stale lock aside and delete it.
///
/// Only one of several waiting processes wins the rename. If the file it moved
/// turns out to be a live lock created in the meantime, it is linked back.
fn break_lock(lock_path: &Path) -> Result<()> {
    let aside = lock_path.with_extension(staging_name("stale"));
    match std::fs::rename(lock_path, &aside) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    }

    if is_stale(&aside) {
        log::warn!(
            "Removing stale lock {} (owner {:?})",
            lock_path.display(),
            owner_pid(&aside)
        );
    } else if let Err(e) = std::fs::hard_link(&aside, lock_path) {
        log::warn!("Could not restore lock {}: {}", lock_path.display(), e);
    }
    let _ = std::fs::remove_file(&aside);
    Ok(())
}
