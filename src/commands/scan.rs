use tracing::{debug, info, warn};

use crate::cli::{Cli, ScanArgs};
use crate::config::ScanOverrides;
use crate::git::GitCollector;
use crate::metadata::MetadataExtractor;
use crate::output::{EventFormat, ScanProgress};
use crate::scanner::{CancellationToken, ProjectScanner, ScanReport};
use crate::snapshot::SnapshotStore;
use crate::{EXIT_INTERRUPTED, EXIT_PROJECT_ERRORS, EXIT_SUCCESS, Result};

use super::context::{report_error, resolve_scan_config, write_output};

#[must_use]
pub fn run_scan(args: &ScanArgs, cli: &Cli) -> i32 {
    match run_scan_impl(args, cli) {
        Ok(exit_code) => exit_code,
        Err(e) => report_error(&e),
    }
}

pub(crate) fn run_scan_impl(args: &ScanArgs, cli: &Cli) -> Result<i32> {
    let config = resolve_scan_config(
        cli,
        ScanOverrides {
            roots: args.roots.clone(),
            ignore: args.ignore.clone(),
            force_update: args.force,
            jobs: args.jobs,
            ..ScanOverrides::default()
        },
    )?;
    let roots = config.require_roots()?;
    info!(roots = roots.len(), jobs = config.jobs, "starting scan");

    let store = SnapshotStore::new(&config.snapshot);
    let previous = store.load();

    let progress = ScanProgress::new(previous.len() as u64, args.events, cli.verbose, cli.quiet);
    let cancel = CancellationToken::new();
    install_interrupt_handler(&cancel);

    let classifier = config.classifier();
    let extractor = MetadataExtractor::with_git(
        classifier.clone(),
        GitCollector::new(config.git_timeout),
    );
    let scanner = ProjectScanner::new(classifier, extractor, config.scan_options());
    let report = scanner.scan(roots, &previous, &progress, &cancel);

    if report.cancelled {
        progress.finish();
        warn!(
            completed = report.projects.len(),
            "scan interrupted; snapshot left unchanged"
        );
        if !cli.quiet {
            eprintln!("Scan interrupted; snapshot left unchanged");
        }
        return Ok(EXIT_INTERRUPTED);
    }

    if args.no_sync {
        debug!("--no-sync given; snapshot not written");
    } else {
        store.sync(&report.projects, &progress)?;
    }
    progress.finish();

    if args.events == EventFormat::Text {
        write_output(&format_summary(&report), cli.quiet);
    }

    Ok(if report.errors > 0 {
        EXIT_PROJECT_ERRORS
    } else {
        EXIT_SUCCESS
    })
}

/// Ctrl-C flips the token; the scan stops at the next project boundary.
fn install_interrupt_handler(cancel: &CancellationToken) {
    let token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || token.cancel()) {
        debug!("interrupt handler not installed: {e}");
    }
}

pub(crate) fn format_summary(report: &ScanReport) -> String {
    format!(
        "Scanned {} projects ({} updated, {} existing, {} errors) in {:.1}s\n",
        report.projects.len(),
        report.updated,
        report.existing,
        report.errors,
        report.elapsed.as_secs_f64()
    )
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
