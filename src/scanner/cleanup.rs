use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::classifier::{LEGACY_META_FILENAME, PathClassifier};
use super::event::{ProgressSink, ScanEvent};

/// Delete every legacy `.project_meta.json` below `roots`, skipping ignored
/// directories. Emits a `deleted` event per removed file and returns the
/// count. Running it again finds nothing to do.
pub fn cleanup_legacy_metadata(
    roots: &[PathBuf],
    classifier: &PathClassifier,
    sink: &dyn ProgressSink,
) -> usize {
    let mut deleted = 0;

    for root in roots {
        let Ok(root) = dunce::canonicalize(root) else {
            debug!(root = %root.display(), "skipping inaccessible root");
            continue;
        };

        let mut stack = vec![root.clone()];
        while let Some(dir) = stack.pop() {
            let Ok(entries) = fs::read_dir(&dir) else {
                debug!(directory = %dir.display(), "skipping unreadable directory");
                continue;
            };

            for entry in entries.filter_map(std::result::Result::ok) {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let path = entry.path();
                if file_type.is_dir() {
                    if !classifier.is_ignored_below(&root, &path) {
                        stack.push(path);
                    }
                } else if file_type.is_file() && entry.file_name() == LEGACY_META_FILENAME {
                    match fs::remove_file(&path) {
                        Ok(()) => {
                            deleted += 1;
                            sink.emit(ScanEvent::Deleted { file: path });
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => {
                            warn!(path = %path.display(), "cannot delete legacy metadata: {e}");
                        }
                    }
                }
            }
        }
    }

    info!(deleted, "legacy metadata cleanup finished");
    deleted
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
