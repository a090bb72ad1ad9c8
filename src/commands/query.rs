use crate::cli::{Cli, DirtyArgs, SearchArgs, ShowArgs, StatsArgs};
use crate::git::GitCollector;
use crate::output::{render_dirty, render_project, render_search, render_stats};
use crate::snapshot::{SearchQuery, dirty, find_project, search, stats};
use crate::{EXIT_SUCCESS, Result, StowError};

use super::context::{open_store, report_error, write_output};

fn finish(result: Result<String>, quiet: bool) -> i32 {
    match result {
        Ok(content) => {
            write_output(&content, quiet);
            EXIT_SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

#[must_use]
pub fn run_search(args: &SearchArgs, cli: &Cli) -> i32 {
    finish(run_search_impl(args, cli), cli.quiet)
}

pub(crate) fn run_search_impl(args: &SearchArgs, cli: &Cli) -> Result<String> {
    let (store, _) = open_store(cli)?;
    let snapshot = store.load();
    let query = SearchQuery {
        text: args.query.clone(),
        stack: args.stack.clone(),
        limit: args.limit,
    };
    render_search(&search(snapshot.records(), &query), args.format)
}

#[must_use]
pub fn run_show(args: &ShowArgs, cli: &Cli) -> i32 {
    finish(run_show_impl(args, cli), cli.quiet)
}

/// Stored record plus a fresh `git status` for git projects.
pub(crate) fn run_show_impl(args: &ShowArgs, cli: &Cli) -> Result<String> {
    let (store, loaded) = open_store(cli)?;
    let snapshot = store.load();
    let record = find_project(snapshot.records(), &args.name)
        .ok_or_else(|| StowError::ProjectNotFound(args.name.clone()))?;

    let git = GitCollector::new(std::time::Duration::from_secs(
        loaded.config.git_timeout_secs.max(1),
    ));
    let live = record
        .git_info
        .summary()
        .and_then(|_| git.read_status(&record.directory));
    render_project(record, live.as_ref(), args.format)
}

#[must_use]
pub fn run_dirty(args: &DirtyArgs, cli: &Cli) -> i32 {
    finish(run_dirty_impl(args, cli), cli.quiet)
}

pub(crate) fn run_dirty_impl(args: &DirtyArgs, cli: &Cli) -> Result<String> {
    let (store, _) = open_store(cli)?;
    let snapshot = store.load();
    render_dirty(&dirty(snapshot.records(), args.kind), args.format)
}

#[must_use]
pub fn run_stats(args: &StatsArgs, cli: &Cli) -> i32 {
    finish(run_stats_impl(args, cli), cli.quiet)
}

pub(crate) fn run_stats_impl(args: &StatsArgs, cli: &Cli) -> Result<String> {
    let (store, _) = open_store(cli)?;
    render_stats(&stats(store.load().records()), args.format)
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
