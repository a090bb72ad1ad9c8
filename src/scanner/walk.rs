//! Recursive walks below a single project directory.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::SystemTime;

use tracing::trace;
use walkdir::{DirEntry, WalkDir};

use super::classifier::{LEGACY_META_FILENAME, PathClassifier};

/// Key used in `file_types` for files without an extension.
pub const NO_EXTENSION: &str = "no_extension";

/// Newest access and modify times seen below a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestTimestamps {
    pub accessed: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

impl LatestTimestamps {
    fn observe(&mut self, accessed: Option<SystemTime>, modified: Option<SystemTime>) {
        self.accessed = self.accessed.max(accessed);
        self.modified = self.modified.max(modified);
    }
}

/// Byte totals and extension counts below a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeSummary {
    pub content_bytes: u64,
    pub libs_bytes: u64,
    pub file_types: BTreeMap<String, u64>,
}

impl SizeSummary {
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.content_bytes.saturating_add(self.libs_bytes)
    }
}

/// Latest access/modify time over every non-ignored file and directory below
/// `dir`. Ignored subtrees are pruned before they are read. The legacy
/// per-project cache file and the snapshot's own files are skipped, and the
/// directory holding the snapshot contributes only its contents. Unreadable
/// entries are skipped.
#[must_use]
pub fn latest_timestamps(classifier: &PathClassifier, dir: &Path) -> LatestTimestamps {
    let mut latest = LatestTimestamps::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            !is_legacy_meta(entry)
                && !classifier.is_snapshot_file(entry.path())
                && !classifier.is_ignored_below(dir, entry.path())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                trace!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if classifier.is_snapshot_dir(entry.path()) {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => latest.observe(meta.accessed().ok(), meta.modified().ok()),
            Err(e) => trace!(path = %entry.path().display(), error = %e, "stat failed"),
        }
    }

    latest
}

/// Splits the bytes of every regular file below `dir` into content and libs.
///
/// A file is libs when any segment of its path relative to `dir` matches an
/// ignore pattern, so everything under an ignored directory stays libs however
/// deep it is. Extension counts cover content files only.
#[must_use]
pub fn directory_sizes(classifier: &PathClassifier, dir: &Path) -> SizeSummary {
    let mut summary = SizeSummary::default();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_legacy_meta(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                trace!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let len = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                trace!(path = %entry.path().display(), error = %e, "stat failed");
                continue;
            }
        };

        if classifier.is_ignored_below(dir, entry.path()) {
            summary.libs_bytes = summary.libs_bytes.saturating_add(len);
        } else {
            summary.content_bytes = summary.content_bytes.saturating_add(len);
            *summary.file_types.entry(extension_key(entry.path())).or_insert(0) += 1;
        }
    }

    summary
}

/// Lowercase `.ext` for `path`, or [`NO_EXTENSION`].
#[must_use]
pub fn extension_key(path: &Path) -> String {
    path.extension().map_or_else(
        || NO_EXTENSION.to_string(),
        |ext| format!(".{}", ext.to_string_lossy().to_lowercase()),
    )
}

fn is_legacy_meta(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.file_name() == LEGACY_META_FILENAME
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
