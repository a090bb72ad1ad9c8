use std::path::{Path, PathBuf};

use crate::state;

/// Directory names skipped by every walk unless configured otherwise.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git",
    "node_modules",
    "venv",
    ".venv",
    "__pycache__",
    ".pytest_cache",
    "build",
    "dist",
    "python3.7",
    "python3.8",
    "python3.9",
    "python3.10",
    "python3.11",
    "python3.12",
    ".next",
];

/// Files or directories whose presence marks a project root.
pub const PROJECT_INDICATORS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "composer.json",
    "build.gradle",
    "pom.xml",
    "Cargo.toml",
    "go.mod",
    ".git",
    "README.md",
    "readme.md",
    "README",
    "readme.txt",
];

/// Per-project cache file written by the previous caching scheme.
///
/// Walks never count it and the cleanup command deletes it.
pub const LEGACY_META_FILENAME: &str = ".project_meta.json";

/// Decides which paths are ignored and which directories are project roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathClassifier {
    /// Lowercased patterns wrapped in slashes (`/node_modules/`).
    wrapped: Vec<String>,
    patterns: Vec<String>,
    /// Snapshot file when it may live inside a scanned tree.
    snapshot: Option<PathBuf>,
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl PathClassifier {
    /// Default ignore set plus `extra` patterns.
    #[must_use]
    pub fn new<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let defaults = DEFAULT_IGNORE_PATTERNS.iter().map(|p| (*p).to_string());
        let extra = extra.into_iter().map(|p| p.as_ref().to_string());
        Self::with_patterns(defaults.chain(extra))
    }

    /// Exactly the given patterns, without the defaults.
    #[must_use]
    pub fn with_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut kept: Vec<String> = Vec::new();
        for pattern in patterns {
            let normalized = normalize(pattern.as_ref());
            let normalized = normalized.trim_matches('/');
            if !normalized.is_empty() && !kept.iter().any(|p| p == normalized) {
                kept.push(normalized.to_string());
            }
        }

        Self {
            wrapped: kept.iter().map(|p| format!("/{p}/")).collect(),
            patterns: kept,
            snapshot: None,
        }
    }

    /// Treat `snapshot`, its lock sidecar, its temp files and the directory
    /// holding them as scanner bookkeeping rather than project content.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: &Path) -> Self {
        let located = match (snapshot.parent(), snapshot.file_name()) {
            (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
                dunce::canonicalize(parent)
                    .map_or_else(|_| snapshot.to_path_buf(), |parent| parent.join(name))
            }
            _ => snapshot.to_path_buf(),
        };
        self.snapshot = Some(located);
        self
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    /// True for the snapshot file and the files written alongside it.
    #[must_use]
    pub fn is_snapshot_file(&self, path: &Path) -> bool {
        self.snapshot
            .as_deref()
            .is_some_and(|snapshot| state::is_snapshot_artifact(snapshot, path))
    }

    /// True for the directory holding the snapshot. Its own modify time moves
    /// on every save.
    #[must_use]
    pub fn is_snapshot_dir(&self, path: &Path) -> bool {
        self.snapshot
            .as_deref()
            .and_then(Path::parent)
            .is_some_and(|parent| parent == path)
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// True if any pattern occurs as a complete path segment (or run of
    /// segments) of `path`. Case-insensitive; `build` never matches `builder`.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        let normalized = normalize(&path.to_string_lossy());
        let wrapped = format!("/{}/", normalized.trim_matches('/'));
        self.wrapped.iter().any(|pattern| wrapped.contains(pattern))
    }

    /// Ignore check for `path` relative to `base`.
    ///
    /// `base` itself is never ignored: a configured root or a project directory
    /// is walked even when one of its ancestors carries an ignored name.
    #[must_use]
    pub fn is_ignored_below(&self, base: &Path, path: &Path) -> bool {
        match path.strip_prefix(base) {
            Ok(relative) => !relative.as_os_str().is_empty() && self.is_ignored(relative),
            Err(_) => self.is_ignored(path),
        }
    }

    /// True if any project indicator exists directly inside `dir`.
    #[must_use]
    pub fn is_project_directory(&self, dir: &Path) -> bool {
        PROJECT_INDICATORS
            .iter()
            .any(|indicator| dir.join(indicator).symlink_metadata().is_ok())
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
