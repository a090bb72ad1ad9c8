//! Text and JSON renderings of snapshot queries.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use super::{OutputFormat, format_bytes};
use crate::Result;
use crate::git::WorkingTreeStatus;
use crate::snapshot::{DirtyProject, ProjectRecord, SnapshotStats};

const STACK_PREVIEW: usize = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit<'a> {
    pub name: &'a str,
    pub directory: &'a Path,
    pub stack: &'a [String],
    pub size: String,
    pub has_git: bool,
    pub uncommitted: usize,
}

impl<'a> SearchHit<'a> {
    #[must_use]
    pub fn new(record: &'a ProjectRecord) -> Self {
        Self {
            name: &record.project_name,
            directory: &record.directory,
            stack: &record.stack[..record.stack.len().min(STACK_PREVIEW)],
            size: format_bytes(record.content_size_bytes),
            has_git: record.git_info.git_detected,
            uncommitted: record.git_info.uncommitted_changes(),
        }
    }
}

/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render_search(records: &[&ProjectRecord], format: OutputFormat) -> Result<String> {
    let hits: Vec<SearchHit<'_>> = records.iter().map(|r| SearchHit::new(r)).collect();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&hits)?),
        OutputFormat::Text if hits.is_empty() => {
            Ok("No projects found matching your criteria\n".to_string())
        }
        OutputFormat::Text => {
            let width = hits.iter().map(|h| h.name.len()).max().unwrap_or(0);
            let mut out = String::new();
            for hit in &hits {
                let dirty = if hit.uncommitted > 0 {
                    format!("  [{} uncommitted]", hit.uncommitted)
                } else {
                    String::new()
                };
                let _ = writeln!(
                    out,
                    "{:<width$}  {:>10}  {}{dirty}\n{:<width$}  {:>10}  {}",
                    hit.name,
                    hit.size,
                    hit.directory.display(),
                    "",
                    "",
                    hit.stack.join(", "),
                );
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SizeView {
    pub code: String,
    pub libs: String,
    pub total: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatusView<'a> {
    pub is_clean: bool,
    pub uncommitted_changes: usize,
    pub ahead: usize,
    pub behind: usize,
    pub branch: Option<&'a str>,
    pub tracking: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitView<'a> {
    pub branch: &'a str,
    pub remotes: &'a [String],
    pub total_commits: usize,
    pub your_commits: usize,
    pub live: Option<LiveStatusView<'a>>,
}

/// Stored record plus live working-tree status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView<'a> {
    pub name: &'a str,
    pub directory: &'a Path,
    pub description: Option<&'a str>,
    pub stack: &'a [String],
    pub size: SizeView,
    pub credentials: &'a [String],
    pub git: Option<GitView<'a>>,
    pub last_modified: Option<String>,
}

impl<'a> DetailView<'a> {
    #[must_use]
    pub fn new(record: &'a ProjectRecord, live: Option<&'a WorkingTreeStatus>) -> Self {
        let git = record.git_info.summary().map(|summary| GitView {
            branch: live
                .and_then(|l| l.branch.as_deref())
                .unwrap_or(summary.current_branch.as_str()),
            remotes: &summary.remotes,
            total_commits: summary.total_commits,
            your_commits: summary.user_commits,
            live: live.map(|l| LiveStatusView {
                is_clean: l.is_clean(),
                uncommitted_changes: l.uncommitted_changes,
                ahead: l.ahead,
                behind: l.behind,
                branch: l.branch.as_deref(),
                tracking: l.upstream.as_deref(),
            }),
        });

        Self {
            name: &record.project_name,
            directory: &record.directory,
            description: record.description.as_deref(),
            stack: &record.stack,
            size: SizeView {
                code: format_bytes(record.content_size_bytes),
                libs: format_bytes(record.libs_size_bytes),
                total: format_bytes(record.total_size_bytes),
            },
            credentials: &record.credentials,
            git,
            last_modified: record.last_modified.as_ref().map(crate::timestamp::format),
        }
    }
}

/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render_project(
    record: &ProjectRecord,
    live: Option<&WorkingTreeStatus>,
    format: OutputFormat,
) -> Result<String> {
    let view = DetailView::new(record, live);
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", view.name);
    let _ = writeln!(out, "  Directory:     {}", view.directory.display());
    if let Some(description) = view.description {
        let _ = writeln!(out, "  Description:   {description}");
    }
    if !view.stack.is_empty() {
        let _ = writeln!(out, "  Stack:         {}", view.stack.join(", "));
    }
    let _ = writeln!(
        out,
        "  Size:          {} code, {} libs, {} total",
        view.size.code, view.size.libs, view.size.total
    );
    if !view.credentials.is_empty() {
        let _ = writeln!(out, "  Credentials:   {}", view.credentials.join(", "));
    }
    if let Some(modified) = &view.last_modified {
        let _ = writeln!(out, "  Last modified: {modified}");
    }
    match &view.git {
        None => {
            let _ = writeln!(out, "  Git:           not a repository");
        }
        Some(git) => {
            let _ = writeln!(
                out,
                "  Git:           {} ({} commits, {} yours)",
                git.branch, git.total_commits, git.your_commits
            );
            for remote in git.remotes {
                let _ = writeln!(out, "  Remote:        {remote}");
            }
            match &git.live {
                Some(live) if live.is_clean => {
                    let _ = writeln!(out, "  Status:        clean");
                }
                Some(live) => {
                    let _ = writeln!(
                        out,
                        "  Status:        {} uncommitted, {} ahead, {} behind",
                        live.uncommitted_changes, live.ahead, live.behind
                    );
                }
                None => {
                    let _ = writeln!(out, "  Status:        unavailable");
                }
            }
        }
    }
    Ok(out)
}

/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render_dirty(projects: &[DirtyProject<'_>], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(projects)?),
        OutputFormat::Text if projects.is_empty() => {
            Ok("All projects are clean and up to date!\n".to_string())
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for p in projects {
                let _ = writeln!(
                    out,
                    "{}  uncommitted={} ahead={} behind={}  {}",
                    p.name,
                    p.uncommitted,
                    p.ahead,
                    p.behind,
                    p.directory.display()
                );
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StackCount<'a> {
    pub name: &'a str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsView<'a> {
    total_projects: usize,
    with_git: usize,
    with_uncommitted: usize,
    behind_remote: usize,
    total_code_size: String,
    total_size: String,
    stack_breakdown: Vec<StackCount<'a>>,
}

/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render_stats(stats: &SnapshotStats, format: OutputFormat) -> Result<String> {
    let view = StatsView {
        total_projects: stats.total_projects,
        with_git: stats.with_git,
        with_uncommitted: stats.with_uncommitted,
        behind_remote: stats.behind_remote,
        total_code_size: format_bytes(stats.total_content_bytes),
        total_size: format_bytes(stats.total_bytes),
        stack_breakdown: stats
            .top_stack
            .iter()
            .map(|(name, count)| StackCount { name, count: *count })
            .collect(),
    };
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut out = String::new();
    let _ = writeln!(out, "Projects:          {}", view.total_projects);
    let _ = writeln!(out, "With git:          {}", view.with_git);
    let _ = writeln!(out, "Uncommitted:       {}", view.with_uncommitted);
    let _ = writeln!(out, "Behind remote:     {}", view.behind_remote);
    let _ = writeln!(out, "Code size:         {}", view.total_code_size);
    let _ = writeln!(out, "Total size:        {}", view.total_size);
    if !view.stack_breakdown.is_empty() {
        let _ = writeln!(out, "\nTop stack:");
        for entry in &view.stack_breakdown {
            let _ = writeln!(out, "  {:<24} {}", entry.name, entry.count);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
