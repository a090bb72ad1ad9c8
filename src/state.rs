//! Snapshot file location and locked, atomic writes.
//!
//! The snapshot lives in the platform data directory unless configured
//! otherwise. Writers hold an advisory lock on a `<snapshot>.lock` sidecar and
//! replace the snapshot through a temp file in the same directory, so readers
//! never observe a half-written file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use directories::ProjectDirs;

use crate::error::{Result, StowError};

const APP_NAME: &str = "stow";
const SNAPSHOT_FILENAME: &str = "projects_metadata.jsonl";
const LOCK_SUFFIX: &str = ".lock";
const TEMP_SUFFIX: &str = ".tmp";

/// Default lock timeout in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Polling interval for lock acquisition in milliseconds.
const LOCK_POLL_INTERVAL_MS: u64 = 50;

/// Platform directories for this application, if a home directory is known.
#[must_use]
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// `<data dir>/stow/projects_metadata.jsonl`, falling back to the current
/// directory when the platform has no data directory.
#[must_use]
pub fn default_snapshot_path() -> PathBuf {
    project_dirs().map_or_else(
        || PathBuf::from(SNAPSHOT_FILENAME),
        |dirs| dirs.data_dir().join(SNAPSHOT_FILENAME),
    )
}

/// Sidecar lock file for `path` (`snapshot.jsonl` -> `snapshot.jsonl.lock`).
#[must_use]
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}

/// Prefix of the temp files a write to `path` creates next to it
/// (`snapshot.jsonl` -> `.snapshot.jsonl.tmp`).
#[must_use]
pub fn temp_prefix(path: &Path) -> OsString {
    let mut prefix = OsString::from(".");
    if let Some(name) = path.file_name() {
        prefix.push(name);
    }
    prefix.push(TEMP_SUFFIX);
    prefix
}

/// True for `snapshot` itself, its lock sidecar and its temp files, compared
/// by file name within the same directory.
#[must_use]
pub fn is_snapshot_artifact(snapshot: &Path, candidate: &Path) -> bool {
    if snapshot.parent() != candidate.parent() {
        return false;
    }
    let (Some(name), Some(own)) = (candidate.file_name(), snapshot.file_name()) else {
        return false;
    };
    if name == own || candidate == lock_path(snapshot) {
        return true;
    }
    let prefix = temp_prefix(snapshot);
    name.as_encoded_bytes().starts_with(prefix.as_encoded_bytes())
}

/// Ensure the parent directory exists for a given path.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

// =============================================================================
// File Locking Utilities
// =============================================================================

#[derive(Debug)]
pub enum LockError {
    Timeout,
    Io(io::Error),
}

impl From<io::Error> for LockError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl std::fmt::Display for LockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "lock acquisition timed out"),
            Self::Io(e) => write!(f, "lock I/O error: {e}"),
        }
    }
}

impl std::error::Error for LockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout => None,
            Self::Io(e) => Some(e),
        }
    }
}

/// Try to acquire an exclusive lock on the file, polling every
/// [`LOCK_POLL_INTERVAL_MS`] until `timeout_ms` elapses.
///
/// # Errors
/// - `LockError::Timeout` if lock cannot be acquired within `timeout_ms`
/// - `LockError::Io` for other I/O errors
pub fn try_lock_exclusive_with_timeout(
    file: &File,
    timeout_ms: u64,
) -> std::result::Result<(), LockError> {
    let start = Instant::now();
    let timeout = Duration::from_millis(timeout_ms);
    let poll_interval = Duration::from_millis(LOCK_POLL_INTERVAL_MS);

    loop {
        match file.try_lock() {
            Ok(()) => return Ok(()),
            Err(TryLockError::WouldBlock) => {
                if start.elapsed() >= timeout {
                    return Err(LockError::Timeout);
                }
                thread::sleep(poll_interval);
            }
            Err(TryLockError::Error(e)) => return Err(LockError::Io(e)),
        }
    }
}

/// Errors are ignored; the lock is also released when the file is closed.
pub fn unlock_file(file: &File) {
    let _ = file.unlock();
}

/// Replace `path` with `contents` while holding the sidecar lock.
///
/// # Errors
/// `SnapshotLocked` when another writer holds the lock past `timeout_ms`;
/// `FileWrite` when the directory, temp file or rename fails.
pub fn atomic_write_with_lock(path: &Path, contents: &[u8], timeout_ms: u64) -> Result<()> {
    let write_err = |source: io::Error| StowError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    ensure_parent_dir(path).map_err(write_err)?;

    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path(path))
        .map_err(write_err)?;

    match try_lock_exclusive_with_timeout(&lock_file, timeout_ms) {
        Ok(()) => {}
        Err(LockError::Timeout) => return Err(StowError::SnapshotLocked(path.to_path_buf())),
        Err(LockError::Io(e)) => return Err(write_err(e)),
    }

    let result = write_replacing(path, contents).map_err(write_err);
    unlock_file(&lock_file);
    result
}

fn write_replacing(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(&temp_prefix(path))
        .tempfile_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
