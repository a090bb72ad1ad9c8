//! Read-only views over loaded snapshot records.

use std::collections::HashMap;

use serde::Serialize;

use super::record::ProjectRecord;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const TOP_STACK_ENTRIES: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub stack: Option<String>,
    pub limit: usize,
}

impl SearchQuery {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: None,
            stack: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    fn matches(&self, record: &ProjectRecord) -> bool {
        if let Some(text) = non_empty(self.text.as_deref()) {
            let text = text.to_lowercase();
            let hit = record.matches_name(&text)
                || record
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&text))
                || stack_contains(record, &text);
            if !hit {
                return false;
            }
        }
        if let Some(stack) = non_empty(self.stack.as_deref())
            && !stack_contains(record, &stack.to_lowercase())
        {
            return false;
        }
        true
    }
}

/// Records matching every filter of `query`, in snapshot order.
#[must_use]
pub fn search<'a>(records: &'a [ProjectRecord], query: &SearchQuery) -> Vec<&'a ProjectRecord> {
    records
        .iter()
        .filter(|record| query.matches(record))
        .take(query.limit)
        .collect()
}

/// Project whose name equals `name` (case-insensitive), otherwise the first
/// whose directory contains it.
#[must_use]
pub fn find_project<'a>(records: &'a [ProjectRecord], name: &str) -> Option<&'a ProjectRecord> {
    let needle = name.to_lowercase();
    records
        .iter()
        .find(|r| r.project_name.to_lowercase() == needle)
        .or_else(|| {
            records
                .iter()
                .find(|r| r.directory.to_string_lossy().to_lowercase().contains(&needle))
        })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirtyKind {
    Uncommitted,
    Behind,
    Ahead,
    #[default]
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirtyProject<'a> {
    pub name: &'a str,
    pub directory: &'a std::path::Path,
    pub uncommitted: usize,
    pub ahead: usize,
    pub behind: usize,
}

/// Git-detected projects in the given dirty state.
#[must_use]
pub fn dirty(records: &[ProjectRecord], kind: DirtyKind) -> Vec<DirtyProject<'_>> {
    records
        .iter()
        .filter(|r| r.git_info.summary().is_some())
        .filter_map(|r| {
            let info = &r.git_info;
            let (uncommitted, ahead, behind) =
                (info.uncommitted_changes(), info.ahead(), info.behind());
            let is_dirty = match kind {
                DirtyKind::Uncommitted => uncommitted > 0,
                DirtyKind::Behind => behind > 0,
                DirtyKind::Ahead => ahead > 0,
                DirtyKind::All => uncommitted > 0 || behind > 0 || ahead > 0,
            };
            is_dirty.then_some(DirtyProject {
                name: &r.project_name,
                directory: &r.directory,
                uncommitted,
                ahead,
                behind,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub total_projects: usize,
    pub with_git: usize,
    pub with_uncommitted: usize,
    pub behind_remote: usize,
    pub total_content_bytes: u64,
    pub total_bytes: u64,
    /// Most common stack entries, most frequent first, ties by name.
    pub top_stack: Vec<(String, usize)>,
}

#[must_use]
pub fn stats(records: &[ProjectRecord]) -> SnapshotStats {
    let mut stack_counts: HashMap<&str, usize> = HashMap::new();
    let mut result = SnapshotStats {
        total_projects: records.len(),
        ..SnapshotStats::default()
    };

    for record in records {
        if record.git_info.summary().is_some() {
            result.with_git += 1;
        }
        if record.git_info.uncommitted_changes() > 0 {
            result.with_uncommitted += 1;
        }
        if record.git_info.behind() > 0 {
            result.behind_remote += 1;
        }
        result.total_content_bytes = result
            .total_content_bytes
            .saturating_add(record.content_size_bytes);
        result.total_bytes = result.total_bytes.saturating_add(record.total_size_bytes);
        for tech in &record.stack {
            *stack_counts.entry(tech.as_str()).or_insert(0) += 1;
        }
    }

    let mut top: Vec<(String, usize)> = stack_counts
        .into_iter()
        .map(|(tech, count)| (tech.to_string(), count))
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(TOP_STACK_ENTRIES);
    result.top_stack = top;

    result
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn stack_contains(record: &ProjectRecord, needle: &str) -> bool {
    record
        .stack
        .iter()
        .any(|tech| tech.to_lowercase().contains(needle))
}
