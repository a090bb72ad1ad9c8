//! Flat git summary stored on every project record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Number of most recent commits inspected per repository.
///
/// Every history aggregate is computed over this window, not the full history:
/// a repository with more commits reports `total_commits == HISTORY_LIMIT` and a
/// `project_created` date taken from the oldest commit inside the window. The
/// bound keeps one repository from dominating scan time.
pub const HISTORY_LIMIT: usize = 1000;

/// Fallback for an unresolvable `user.name` / `user.email`.
pub const UNKNOWN_IDENTITY: &str = "Unknown";

/// Fallback branch name when HEAD cannot be resolved to a branch.
pub const UNKNOWN_BRANCH: &str = "unknown";

/// Git state of a project directory.
///
/// Serialized flat: `{"git_detected": false}` for plain directories,
/// `{"git_detected": false, "git_error": "..."}` when inspection failed, and the
/// repository fields inline next to `"git_detected": true` otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitInfo {
    #[serde(default)]
    pub git_detected: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_error: Option<String>,

    #[serde(flatten)]
    pub repository: Option<RepositorySummary>,
}

impl GitInfo {
    #[must_use]
    pub const fn not_detected() -> Self {
        Self {
            git_detected: false,
            git_error: None,
            repository: None,
        }
    }

    #[must_use]
    pub const fn failed(message: String) -> Self {
        Self {
            git_detected: false,
            git_error: Some(message),
            repository: None,
        }
    }

    #[must_use]
    pub const fn detected(repository: RepositorySummary) -> Self {
        Self {
            git_detected: true,
            git_error: None,
            repository: Some(repository),
        }
    }

    /// Repository summary, only when git was detected.
    #[must_use]
    pub fn summary(&self) -> Option<&RepositorySummary> {
        self.repository.as_ref().filter(|_| self.git_detected)
    }

    #[must_use]
    pub fn uncommitted_changes(&self) -> usize {
        self.summary().map_or(0, |s| s.uncommitted_changes)
    }

    #[must_use]
    pub fn ahead(&self) -> usize {
        self.summary().map_or(0, |s| s.ahead)
    }

    #[must_use]
    pub fn behind(&self) -> usize {
        self.summary().map_or(0, |s| s.behind)
    }
}

/// Repository fields of [`GitInfo`].
///
/// Fields added after the first snapshot format default when absent so older
/// snapshot lines keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositorySummary {
    pub current_user: String,
    pub current_email: String,
    pub total_commits: usize,

    #[serde(default)]
    pub user_commits: usize,

    #[serde(default, with = "timestamp::optional")]
    pub project_created: Option<DateTime<Utc>>,

    #[serde(default, with = "timestamp::optional")]
    pub last_total_commit_date: Option<DateTime<Utc>>,

    #[serde(default, with = "timestamp::optional")]
    pub last_user_commit_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub remotes: Vec<String>,

    #[serde(default = "default_branch")]
    pub current_branch: String,

    #[serde(default)]
    pub ahead: usize,

    #[serde(default)]
    pub behind: usize,

    #[serde(default)]
    pub has_remote_tracking: bool,

    #[serde(default)]
    pub uncommitted_changes: usize,

    #[serde(default)]
    pub is_clean: bool,
}

fn default_branch() -> String {
    UNKNOWN_BRANCH.to_string()
}

/// Resolved local identity used to attribute commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: UNKNOWN_IDENTITY.to_string(),
            email: UNKNOWN_IDENTITY.to_string(),
        }
    }
}

impl Identity {
    /// A commit belongs to the user when either the author name or the author
    /// email matches.
    ///
    /// Two contributors that both lack config resolve to `"Unknown"` and are
    /// attributed together.
    #[must_use]
    pub fn authored(&self, commit: &CommitEntry) -> bool {
        commit.author_name == self.name || commit.author_email == self.email
    }
}

/// One commit as seen by the history walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEntry {
    pub author_name: String,
    pub author_email: String,
    pub date: Option<DateTime<Utc>>,
}

/// Aggregates over the bounded history window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub total_commits: usize,
    pub user_commits: usize,
    pub first_commit_date: Option<DateTime<Utc>>,
    pub last_commit_date: Option<DateTime<Utc>>,
    pub last_user_commit_date: Option<DateTime<Utc>>,
}

impl HistorySummary {
    /// Summarize commits ordered newest first.
    ///
    /// At most [`HISTORY_LIMIT`] commits are consumed from the iterator.
    pub fn from_commits<I>(commits: I, identity: &Identity) -> Self
    where
        I: IntoIterator<Item = CommitEntry>,
    {
        let mut summary = Self::default();

        for commit in commits.into_iter().take(HISTORY_LIMIT) {
            if summary.total_commits == 0 {
                summary.last_commit_date = commit.date;
            }
            summary.total_commits += 1;
            summary.first_commit_date = commit.date;

            if identity.authored(&commit) {
                if summary.user_commits == 0 {
                    summary.last_user_commit_date = commit.date;
                }
                summary.user_commits += 1;
            }
        }

        summary
    }
}

#[cfg(test)]
#[path = "info_tests.rs"]
mod tests;
