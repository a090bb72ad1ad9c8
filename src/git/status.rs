//! Working-tree status read through the `git` binary.
//!
//! `git status --porcelain --branch` gives branch, upstream, ahead/behind and the
//! dirty file count in one bounded subprocess call.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::{Result, StowError};

/// Default upper bound for one `git status` invocation.
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Parsed `git status --porcelain=v1 --branch` output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    pub branch: Option<String>,
    pub upstream: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    pub uncommitted_changes: usize,
}

impl WorkingTreeStatus {
    #[must_use]
    pub const fn has_remote_tracking(&self) -> bool {
        self.upstream.is_some()
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.uncommitted_changes == 0
    }

    /// Parse porcelain v1 output with a leading `## ` branch header.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let mut status = Self::default();

        for line in output.lines() {
            if let Some(header) = line.strip_prefix("## ") {
                status.apply_branch_header(header);
            } else if !line.trim().is_empty() {
                status.uncommitted_changes += 1;
            }
        }

        status
    }

    fn apply_branch_header(&mut self, header: &str) {
        let (refs, counts) = match header.split_once(" [") {
            Some((refs, rest)) => (refs, rest.trim_end_matches(']')),
            None => (header, ""),
        };

        let refs = refs
            .strip_prefix("No commits yet on ")
            .or_else(|| refs.strip_prefix("Initial commit on "))
            .unwrap_or(refs);

        match refs.split_once("...") {
            Some((branch, upstream)) => {
                self.branch = Some(branch.to_string());
                self.upstream = Some(upstream.to_string());
            }
            None if refs.starts_with("HEAD (no branch)") => {}
            None => self.branch = Some(refs.to_string()),
        }

        for part in counts.split(',').map(str::trim) {
            if let Some(n) = part.strip_prefix("ahead ") {
                self.ahead = n.parse().unwrap_or(0);
            } else if let Some(n) = part.strip_prefix("behind ") {
                self.behind = n.parse().unwrap_or(0);
            }
        }
    }
}

/// Runs `git status` with a hard timeout.
#[derive(Debug, Clone, Copy)]
pub struct StatusProbe {
    timeout: Duration,
}

impl Default for StatusProbe {
    fn default() -> Self {
        Self::new(DEFAULT_GIT_TIMEOUT)
    }
}

impl StatusProbe {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read the working-tree status of the repository containing `dir`.
    ///
    /// # Errors
    /// Returns an error if `git` cannot be spawned, exits unsuccessfully, or does
    /// not finish within the timeout (the child is killed in that case).
    pub fn probe(&self, dir: &Path) -> Result<WorkingTreeStatus> {
        let mut child = Command::new("git")
            .args(["status", "--porcelain=v1", "--branch", "--untracked-files=normal"])
            .current_dir(dir)
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| StowError::Git(format!("Failed to run git status: {e}")))?;

        // Drain stdout on a separate thread so a large status cannot fill the
        // pipe and block the child while we poll for exit.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| StowError::Git("git status stdout unavailable".to_string()))?;
        let reader = thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        });

        let started = Instant::now();
        let exit = loop {
            match child.try_wait()? {
                Some(exit) => break exit,
                None if started.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = reader.join();
                    return Err(StowError::Git(format!(
                        "git status timed out after {}s",
                        self.timeout.as_secs_f32()
                    )));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let output = reader
            .join()
            .map_err(|_| StowError::Git("git status reader panicked".to_string()))??;

        if !exit.success() {
            return Err(StowError::Git(format!("git status exited with {exit}")));
        }

        Ok(WorkingTreeStatus::parse(&output))
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
