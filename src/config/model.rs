use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::git::DEFAULT_GIT_TIMEOUT;
use crate::scanner::{PathClassifier, ScanOptions};
use crate::{Result, StowError};

/// Environment variable holding comma-separated scan roots.
pub const SCAN_ROOTS_ENV: &str = "SCAN_ROOTS";

/// Contents of a `config.toml` / `.stow.toml` file.
///
/// ```toml
/// roots = ["~/code", "/srv/projects"]
/// ignore = ["vendor", "target"]
/// snapshot = "~/.local/share/stow/projects_metadata.jsonl"
/// jobs = 4
/// git_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directories to scan. `~/` expands to the home directory.
    pub roots: Vec<String>,

    /// Ignore patterns added to the built-in set.
    pub ignore: Vec<String>,

    /// Snapshot file; the platform data directory when unset.
    pub snapshot: Option<String>,

    /// Projects extracted concurrently.
    pub jobs: usize,

    /// Upper bound for one `git status` call.
    pub git_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            ignore: Vec::new(),
            snapshot: None,
            jobs: 1,
            git_timeout_secs: DEFAULT_GIT_TIMEOUT.as_secs(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOverrides {
    pub roots: Vec<PathBuf>,
    pub ignore: Vec<String>,
    pub snapshot: Option<PathBuf>,
    pub force_update: bool,
    pub jobs: Option<usize>,
    /// Raw `SCAN_ROOTS` value, used when neither the command line nor the
    /// file lists roots.
    pub env_roots: Option<String>,
}

/// Effective settings for one invocation. Built once and passed down; nothing
/// below reads the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanConfig {
    pub roots: Vec<PathBuf>,
    /// Extra ignore patterns on top of the built-in ones.
    pub ignore: Vec<String>,
    pub snapshot: PathBuf,
    pub force_update: bool,
    pub jobs: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub git_timeout: Duration,
}

impl ScanConfig {
    #[must_use]
    pub fn classifier(&self) -> PathClassifier {
        PathClassifier::new(&self.ignore).with_snapshot(&self.snapshot)
    }

    #[must_use]
    pub const fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            force_update: self.force_update,
            jobs: self.jobs,
        }
    }

    /// # Errors
    /// Returns a config error when no root is configured anywhere.
    pub fn require_roots(&self) -> Result<&[PathBuf]> {
        if self.roots.is_empty() {
            return Err(StowError::Config(format!(
                "no scan roots: pass ROOTS, set `roots` in the config file, or set {SCAN_ROOTS_ENV}"
            )));
        }
        Ok(&self.roots)
    }
}

impl Config {
    /// Merge the file with command-line overrides.
    ///
    /// # Errors
    /// Returns a config error for `jobs = 0` or `git_timeout_secs = 0`.
    pub fn to_scan_config(
        &self,
        overrides: &ScanOverrides,
        home: Option<&Path>,
        default_snapshot: &Path,
    ) -> Result<ScanConfig> {
        let jobs = overrides.jobs.unwrap_or(self.jobs);
        if jobs == 0 {
            return Err(StowError::Config("jobs must be at least 1".to_string()));
        }
        if self.git_timeout_secs == 0 {
            return Err(StowError::Config(
                "git_timeout_secs must be at least 1".to_string(),
            ));
        }

        let roots = if !overrides.roots.is_empty() {
            overrides.roots.clone()
        } else if !self.roots.is_empty() {
            self.roots.iter().map(|r| expand_home(r, home)).collect()
        } else {
            overrides
                .env_roots
                .as_deref()
                .map(|raw| split_roots(raw).map(|r| expand_home(r, home)).collect())
                .unwrap_or_default()
        };

        let mut ignore = self.ignore.clone();
        ignore.extend(overrides.ignore.iter().cloned());

        Ok(ScanConfig {
            roots,
            ignore,
            snapshot: self.snapshot_path(overrides.snapshot.as_deref(), home, default_snapshot),
            force_update: overrides.force_update,
            jobs,
            git_timeout: Duration::from_secs(self.git_timeout_secs),
        })
    }

    /// Command-line path, else the configured path, else `default`.
    #[must_use]
    pub fn snapshot_path(
        &self,
        cli: Option<&Path>,
        home: Option<&Path>,
        default: &Path,
    ) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.snapshot.as_deref().map(|s| expand_home(s, home)))
            .unwrap_or_else(|| default.to_path_buf())
    }
}

/// Expand a leading `~` or `~/` using `home`.
#[must_use]
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    let trimmed = raw.trim();
    match (trimmed, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

fn split_roots(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|r| !r.is_empty())
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde `serialize_with` signature
fn serialize_secs<S: serde::Serializer>(
    value: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
