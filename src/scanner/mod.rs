//! Project discovery and incremental resolution against a previous snapshot.

mod classifier;
mod cleanup;
mod event;
mod walk;

pub use classifier::{
    DEFAULT_IGNORE_PATTERNS, LEGACY_META_FILENAME, PROJECT_INDICATORS, PathClassifier,
};
pub use cleanup::cleanup_legacy_metadata;
pub use event::{CancellationToken, EventLog, NoProgress, ProgressSink, ScanEvent};
pub use walk::{
    LatestTimestamps, NO_EXTENSION, SizeSummary, directory_sizes, extension_key, latest_timestamps,
};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::metadata::Extract;
use crate::snapshot::{ProjectRecord, Snapshot};
use crate::timestamp;

/// Error text for directories that cannot be recorded in the snapshot.
pub const NON_UTF8_PATH: &str = "path is not valid UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Re-extract every project regardless of the snapshot.
    pub force_update: bool,
    /// Leaf projects resolved concurrently; `1` keeps everything on the
    /// calling thread.
    pub jobs: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            force_update: false,
            jobs: 1,
        }
    }
}

/// Outcome of one scan run.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Leaf projects in discovery order.
    pub projects: Vec<ProjectRecord>,
    pub updated: usize,
    pub existing: usize,
    pub errors: usize,
    /// Set when the run stopped early; `projects` then holds only the
    /// projects resolved before cancellation.
    pub cancelled: bool,
    pub elapsed: Duration,
}

enum Resolution {
    Updated(ProjectRecord),
    Existing(ProjectRecord),
    Failed,
}

enum Visit {
    /// Directory with no project indicator: recurse into child directories.
    Directory(PathBuf),
    /// Directory with an indicator: container or leaf project.
    Candidate(PathBuf),
}

/// Directory listing used during discovery.
pub trait DirectoryListing: Send + Sync {
    /// Child directories of `dir`, in any order. Symlinks are not followed.
    ///
    /// # Errors
    /// Returns an error if `dir` cannot be listed.
    fn child_directories(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealDirectoryListing;

impl DirectoryListing for RealDirectoryListing {
    fn child_directories(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        Ok(fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .map(|entry| entry.path())
            .collect())
    }
}

/// Walks roots, finds leaf projects and resolves each one either from the
/// previous snapshot or by extraction.
pub struct ProjectScanner<E: Extract> {
    classifier: PathClassifier,
    extractor: E,
    options: ScanOptions,
    listing: Box<dyn DirectoryListing>,
}

impl<E: Extract> ProjectScanner<E> {
    #[must_use]
    pub fn new(classifier: PathClassifier, extractor: E, options: ScanOptions) -> Self {
        Self {
            classifier,
            extractor,
            options,
            listing: Box::new(RealDirectoryListing),
        }
    }

    /// Replace the directory listing used by discovery.
    #[must_use]
    pub fn with_listing(mut self, listing: impl DirectoryListing + 'static) -> Self {
        self.listing = Box::new(listing);
        self
    }

    #[must_use]
    pub const fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    #[must_use]
    pub const fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Leaf project directories under `roots`, depth-first with children in
    /// name order, each reported once.
    ///
    /// A candidate with candidate children is a container: it is not a
    /// project itself and only its candidate children are descended into. A
    /// candidate without them is a leaf, and nothing inside it is explored.
    /// Inaccessible roots are skipped. Unreadable directories below a root and
    /// directories whose path is not valid UTF-8 are reported as `error`
    /// events.
    pub fn discover(&self, roots: &[PathBuf], sink: &dyn ProgressSink) -> Vec<PathBuf> {
        self.walk_roots(roots, sink).0
    }

    fn walk_roots(&self, roots: &[PathBuf], sink: &dyn ProgressSink) -> (Vec<PathBuf>, usize) {
        let mut leaves: IndexSet<PathBuf> = IndexSet::new();
        let mut rejected = 0;

        for root in roots {
            let Some(root) = accessible_root(root) else {
                continue;
            };

            let mut stack = vec![self.classify(root.clone())];
            while let Some(visit) = stack.pop() {
                let (dir, is_candidate) = match visit {
                    Visit::Directory(dir) => (dir, false),
                    Visit::Candidate(dir) => (dir, true),
                };
                let Some(children) = self.child_dirs(&root, &dir, sink, &mut rejected) else {
                    continue;
                };

                if !is_candidate {
                    stack.extend(children.into_iter().rev().map(|c| self.classify(c)));
                    continue;
                }

                let nested: Vec<PathBuf> = children
                    .into_iter()
                    .filter(|child| self.classifier.is_project_directory(child))
                    .collect();
                if nested.is_empty() {
                    leaves.insert(dir);
                } else {
                    stack.extend(nested.into_iter().rev().map(Visit::Candidate));
                }
            }
        }

        (leaves.into_iter().collect(), rejected)
    }

    /// Discover and resolve every leaf project under `roots`.
    ///
    /// Each project yields exactly one `updated`, `existing` or `error` event,
    /// emitted before its record is added. A single `complete` event closes
    /// the run. Nothing is written to disk.
    pub fn scan(
        &self,
        roots: &[PathBuf],
        previous: &Snapshot,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> ScanReport {
        let started = Instant::now();
        let (leaves, rejected) = self.walk_roots(roots, sink);
        debug!(count = leaves.len(), rejected, "discovered leaf projects");

        let resolve = |dir: &PathBuf| {
            if cancel.is_cancelled() {
                None
            } else {
                Some(self.resolve(dir, previous, sink))
            }
        };

        let resolutions: Vec<Option<Resolution>> = if self.options.jobs > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.jobs)
                .build()
            {
                Ok(pool) => pool.install(|| leaves.par_iter().map(resolve).collect()),
                Err(e) => {
                    warn!("falling back to sequential scan: {e}");
                    leaves.iter().map(resolve).collect()
                }
            }
        } else {
            leaves.iter().map(resolve).collect()
        };

        let mut report = ScanReport {
            errors: rejected,
            ..ScanReport::default()
        };
        for resolution in resolutions {
            match resolution {
                Some(Resolution::Updated(record)) => {
                    report.updated += 1;
                    report.projects.push(record);
                }
                Some(Resolution::Existing(record)) => {
                    report.existing += 1;
                    report.projects.push(record);
                }
                Some(Resolution::Failed) => report.errors += 1,
                None => report.cancelled = true,
            }
        }

        report.elapsed = started.elapsed();
        sink.emit(ScanEvent::Complete {
            total_time: report.elapsed.as_secs_f64(),
            count: report.projects.len(),
        });
        info!(
            projects = report.projects.len(),
            updated = report.updated,
            existing = report.existing,
            errors = report.errors,
            cancelled = report.cancelled,
            "scan finished"
        );
        report
    }

    /// True when `dir` must be re-extracted rather than served from `cached`.
    ///
    /// Both sides are compared at millisecond precision, the precision the
    /// snapshot stores. A tree with no readable timestamps reuses the cache.
    #[must_use]
    pub fn is_stale(&self, dir: &Path, cached: &ProjectRecord) -> bool {
        let live = latest_timestamps(&self.classifier, dir)
            .modified
            .map(timestamp::from_system_time);
        match (live, cached.last_modified) {
            (Some(live), Some(cached)) => live > cached,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn resolve(&self, dir: &Path, previous: &Snapshot, sink: &dyn ProgressSink) -> Resolution {
        let started = Instant::now();
        let cached = previous.get(dir);

        if let Some(cached) = cached
            && !self.options.force_update
            && !self.is_stale(dir, cached)
        {
            sink.emit(ScanEvent::Existing {
                directory: dir.to_path_buf(),
                processing_time: started.elapsed().as_secs_f64(),
            });
            return Resolution::Existing(cached.clone());
        }

        match self.extractor.extract(dir) {
            Ok(mut record) => {
                if let Some(cached) = cached {
                    for (key, value) in &cached.extra {
                        record.extra.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
                sink.emit(ScanEvent::Updated {
                    directory: dir.to_path_buf(),
                    processing_time: started.elapsed().as_secs_f64(),
                });
                Resolution::Updated(record)
            }
            Err(e) => {
                warn!(directory = %dir.display(), "extraction failed: {e}");
                sink.emit(ScanEvent::Error {
                    directory: dir.to_path_buf(),
                    error: e.to_string(),
                });
                Resolution::Failed
            }
        }
    }

    fn classify(&self, dir: PathBuf) -> Visit {
        if self.classifier.is_project_directory(&dir) {
            Visit::Candidate(dir)
        } else {
            Visit::Directory(dir)
        }
    }

    /// Non-ignored child directories of `dir`, sorted by name. Children
    /// whose path is not valid UTF-8 cannot be stored in the snapshot; each is
    /// reported and counted in `rejected`. `None` when `dir` cannot be listed,
    /// which is also reported and counted.
    fn child_dirs(
        &self,
        root: &Path,
        dir: &Path,
        sink: &dyn ProgressSink,
        rejected: &mut usize,
    ) -> Option<Vec<PathBuf>> {
        let listed = match self.listing.child_directories(dir) {
            Ok(listed) => listed,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(directory = %dir.display(), "directory vanished during scan");
                return Some(Vec::new());
            }
            Err(e) => {
                warn!(directory = %dir.display(), "cannot read directory: {e}");
                sink.emit(ScanEvent::Error {
                    directory: dir.to_path_buf(),
                    error: e.to_string(),
                });
                *rejected += 1;
                return None;
            }
        };

        let mut children = Vec::with_capacity(listed.len());
        for path in listed {
            if self.classifier.is_ignored_below(root, &path) {
                continue;
            }
            if path.to_str().is_none() {
                warn!(directory = %path.display(), "skipping directory with non UTF-8 path");
                sink.emit(ScanEvent::Error {
                    directory: path,
                    error: NON_UTF8_PATH.to_string(),
                });
                *rejected += 1;
                continue;
            }
            children.push(path);
        }
        children.sort();
        Some(children)
    }
}

/// Canonical form of `root` when it is a listable directory.
fn accessible_root(root: &Path) -> Option<PathBuf> {
    let canonical = match dunce::canonicalize(root) {
        Ok(canonical) => canonical,
        Err(e) => {
            debug!(root = %root.display(), "skipping inaccessible root: {e}");
            return None;
        }
    };
    if canonical.to_str().is_none() {
        warn!(root = %canonical.display(), "skipping root with non UTF-8 path");
        return None;
    }
    match fs::read_dir(&canonical) {
        Ok(_) => Some(canonical),
        Err(e) => {
            debug!(root = %canonical.display(), "skipping unreadable root: {e}");
            None
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
