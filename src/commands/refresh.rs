use std::time::Instant;

use tracing::info;

use crate::cli::{Cli, RefreshArgs};
use crate::config::ScanOverrides;
use crate::git::{GitCollector, GitInspector};
use crate::output::{EventFormat, ScanProgress};
use crate::scanner::{ProgressSink, ScanEvent};
use crate::snapshot::{ProjectRecord, SnapshotStore};
use crate::{EXIT_SUCCESS, Result, StowError};

use super::context::{report_error, resolve_scan_config, write_output};

#[must_use]
pub fn run_refresh(args: &RefreshArgs, cli: &Cli) -> i32 {
    match run_refresh_impl(args, cli) {
        Ok(count) => {
            write_output(&format!("Refreshed {count} project(s)\n"), cli.quiet);
            EXIT_SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

/// Re-collect `git_info` for the selected records and save. Nothing else in
/// the records changes.
pub(crate) fn run_refresh_impl(args: &RefreshArgs, cli: &Cli) -> Result<usize> {
    // Roots are not needed here, only the snapshot path and git timeout.
    let config = resolve_scan_config(cli, ScanOverrides::default())?;
    let store = SnapshotStore::new(&config.snapshot);
    let mut records = store.load().into_records();

    let selected = select_records(&records, &args.names, args.all)?;
    let progress = ScanProgress::new(
        selected.len() as u64,
        EventFormat::Text,
        cli.verbose,
        cli.quiet,
    );
    let git = GitCollector::new(config.git_timeout);
    refresh_git(&mut records, &selected, &git, &progress);

    store.sync(&records, &progress)?;
    progress.finish();
    info!(count = selected.len(), "refreshed git state");
    Ok(selected.len())
}

/// Indices of records matching any of `names`, or every record with `all`.
///
/// # Errors
/// Returns `ProjectNotFound` for the first name that matches nothing.
pub(crate) fn select_records(
    records: &[ProjectRecord],
    names: &[String],
    all: bool,
) -> Result<Vec<usize>> {
    if all {
        return Ok((0..records.len()).collect());
    }

    let mut selected = Vec::new();
    for name in names {
        let before = selected.len();
        selected.extend(
            records
                .iter()
                .enumerate()
                .filter(|(_, record)| record.matches_name(name))
                .map(|(index, _)| index),
        );
        if selected.len() == before {
            return Err(StowError::ProjectNotFound(name.clone()));
        }
    }
    selected.sort_unstable();
    selected.dedup();
    Ok(selected)
}

pub(crate) fn refresh_git<G: GitInspector>(
    records: &mut [ProjectRecord],
    selected: &[usize],
    git: &G,
    sink: &dyn ProgressSink,
) {
    for &index in selected {
        let Some(record) = records.get_mut(index) else {
            continue;
        };
        let started = Instant::now();
        record.git_info = git.inspect(&record.directory);
        sink.emit(ScanEvent::Updated {
            directory: record.directory.clone(),
            processing_time: started.elapsed().as_secs_f64(),
        });
    }
}

#[cfg(test)]
#[path = "refresh_tests.rs"]
mod tests;
