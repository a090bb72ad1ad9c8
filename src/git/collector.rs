use std::path::Path;
use std::time::Duration;

use gix::bstr::BStr;
use tracing::debug;

use super::info::{
    CommitEntry, GitInfo, HistorySummary, Identity, RepositorySummary, UNKNOWN_BRANCH,
    UNKNOWN_IDENTITY,
};
use super::status::{StatusProbe, WorkingTreeStatus};
use crate::timestamp;
use crate::{Result, StowError};

/// Inspects the git state of a directory.
///
/// Implementations never fail: a directory outside any repository yields
/// [`GitInfo::not_detected`], an inspection failure yields [`GitInfo::failed`].
pub trait GitInspector: Sync {
    fn inspect(&self, path: &Path) -> GitInfo;
}

/// Git inspection backed by gix for repository data and the `git` binary for
/// working-tree status.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCollector {
    status: StatusProbe,
}

impl GitCollector {
    #[must_use]
    pub const fn new(status_timeout: Duration) -> Self {
        Self {
            status: StatusProbe::new(status_timeout),
        }
    }

    /// Collect the full summary, propagating unexpected failures.
    ///
    /// # Errors
    /// Returns an error if the repository exists but its history cannot be walked.
    pub fn try_collect(&self, path: &Path) -> Result<GitInfo> {
        let repo = match gix::discover(path) {
            Ok(repo) => repo,
            Err(e) => {
                debug!(path = %path.display(), "no git repository: {e}");
                return Ok(GitInfo::not_detected());
            }
        };

        let identity = read_identity(&repo);
        let history = read_history(&repo, &identity)?;
        let remotes = read_remotes(&repo);
        let current_branch = read_branch(&repo);
        let status = self.read_status(path);

        Ok(GitInfo::detected(RepositorySummary {
            current_user: identity.name,
            current_email: identity.email,
            total_commits: history.total_commits,
            user_commits: history.user_commits,
            project_created: history.first_commit_date,
            last_total_commit_date: history.last_commit_date,
            last_user_commit_date: history.last_user_commit_date,
            remotes,
            current_branch,
            ahead: status.as_ref().map_or(0, |s| s.ahead),
            behind: status.as_ref().map_or(0, |s| s.behind),
            has_remote_tracking: status
                .as_ref()
                .is_some_and(WorkingTreeStatus::has_remote_tracking),
            uncommitted_changes: status.as_ref().map_or(0, |s| s.uncommitted_changes),
            is_clean: status.as_ref().is_some_and(WorkingTreeStatus::is_clean),
        }))
    }

    /// Live working-tree status, `None` when it cannot be read in time.
    #[must_use]
    pub fn read_status(&self, path: &Path) -> Option<WorkingTreeStatus> {
        match self.status.probe(path) {
            Ok(status) => Some(status),
            Err(e) => {
                debug!(path = %path.display(), "git status unavailable: {e}");
                None
            }
        }
    }
}

impl GitInspector for GitCollector {
    fn inspect(&self, path: &Path) -> GitInfo {
        self.try_collect(path).unwrap_or_else(|e| {
            debug!(path = %path.display(), "git inspection failed: {e}");
            GitInfo::failed(e.to_string())
        })
    }
}

fn read_identity(repo: &gix::Repository) -> Identity {
    let config = repo.config_snapshot();
    let read = |key: &str| {
        config
            .string(key)
            .map(|value| value.to_string())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string())
    };

    Identity {
        name: read("user.name"),
        email: read("user.email"),
    }
}

fn read_history(repo: &gix::Repository, identity: &Identity) -> Result<HistorySummary> {
    // Unborn HEAD: a repository without commits has an empty history.
    let Ok(head) = repo.head_id() else {
        return Ok(HistorySummary::default());
    };

    let walk = repo
        .rev_walk([head.detach()])
        .sorting(gix::revision::walk::Sorting::ByCommitTime(
            Default::default(),
        ))
        .all()
        .map_err(|e| StowError::Git(format!("Failed to walk history: {e}")))?;

    let commits = walk.map_while(|info| {
        let info = info
            .map_err(|e| debug!("history walk stopped: {e}"))
            .ok()?;
        let commit = info.object().ok()?;
        let author = commit.author().ok()?;
        Some(CommitEntry {
            author_name: author.name.to_string(),
            author_email: author.email.to_string(),
            date: timestamp::from_unix_seconds(author.seconds()),
        })
    });

    Ok(HistorySummary::from_commits(commits, identity))
}

fn read_remotes(repo: &gix::Repository) -> Vec<String> {
    repo.remote_names()
        .iter()
        .filter_map(|name| {
            let name: &BStr = name.as_ref();
            let remote = repo.find_remote(name).ok()?;
            remote
                .url(gix::remote::Direction::Fetch)
                .or_else(|| remote.url(gix::remote::Direction::Push))
                .map(|url| url.to_bstring().to_string())
        })
        .filter(|url| !url.is_empty())
        .collect()
}

fn read_branch(repo: &gix::Repository) -> String {
    repo.head_name()
        .ok()
        .flatten()
        .map_or_else(|| UNKNOWN_BRANCH.to_string(), |name| name.shorten().to_string())
}
