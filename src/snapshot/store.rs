use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::record::ProjectRecord;
use crate::Result;
use crate::scanner::{ProgressSink, ScanEvent};
use crate::state;

/// Records loaded from a snapshot file, indexed by directory.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<ProjectRecord>,
    index: HashMap<PathBuf, usize>,
}

impl Snapshot {
    /// Later records replace earlier ones with the same directory, keeping the
    /// position of the first.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = ProjectRecord>) -> Self {
        let mut snapshot = Self::default();
        for record in records {
            if let Some(&pos) = snapshot.index.get(&record.directory) {
                snapshot.records[pos] = record;
            } else {
                snapshot
                    .index
                    .insert(record.directory.clone(), snapshot.records.len());
                snapshot.records.push(record);
            }
        }
        snapshot
    }

    #[must_use]
    pub fn get(&self, directory: &Path) -> Option<&ProjectRecord> {
        self.index.get(directory).map(|&pos| &self.records[pos])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ProjectRecord> {
        self.records
    }
}

/// Newline-delimited JSON snapshot file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: state::DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub const fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every parseable line. A missing or unreadable file is an empty
    /// snapshot; malformed lines are skipped.
    #[must_use]
    pub fn load(&self) -> Snapshot {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet");
                return Snapshot::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "snapshot unreadable, starting empty: {e}");
                return Snapshot::default();
            }
        };
        Snapshot::from_records(parse_lines(&contents))
    }

    /// Overwrite the file with one compact JSON object per line.
    ///
    /// # Errors
    /// Returns an error if a record cannot be serialized, the lock is held by
    /// another writer, or the file cannot be written.
    pub fn save(&self, records: &[ProjectRecord]) -> Result<()> {
        let contents = serialize_lines(records)?;
        state::atomic_write_with_lock(&self.path, contents.as_bytes(), self.lock_timeout_ms)?;
        info!(path = %self.path.display(), count = records.len(), "snapshot saved");
        Ok(())
    }

    /// [`save`](Self::save), then report a `synced` event.
    ///
    /// # Errors
    /// Same as [`save`](Self::save).
    pub fn sync(&self, records: &[ProjectRecord], sink: &dyn ProgressSink) -> Result<()> {
        self.save(records)?;
        sink.emit(ScanEvent::Synced {
            file: self.path.clone(),
        });
        Ok(())
    }
}

/// Parse snapshot lines, skipping blank and malformed ones.
#[must_use]
pub fn parse_lines(contents: &str) -> Vec<ProjectRecord> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(number, line)| match serde_json::from_str::<ProjectRecord>(line) {
            Ok(record) if record.directory.as_os_str().is_empty() => {
                warn!(line = number + 1, "skipping snapshot line without a directory");
                None
            }
            Ok(mut record) => {
                record.recompute_total();
                Some(record)
            }
            Err(e) => {
                warn!(line = number + 1, "skipping malformed snapshot line: {e}");
                None
            }
        })
        .collect()
}

/// Serialize records in the snapshot line format.
///
/// # Errors
/// Returns an error if a record cannot be serialized.
pub fn serialize_lines(records: &[ProjectRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}
