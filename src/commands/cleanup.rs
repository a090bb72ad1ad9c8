use crate::cli::{CleanupArgs, Cli};
use crate::config::ScanOverrides;
use crate::output::format_event;
use crate::scanner::{ScanEvent, cleanup_legacy_metadata};
use crate::{EXIT_SUCCESS, Result};

use super::context::{report_error, resolve_scan_config, write_output};

#[must_use]
pub fn run_cleanup(args: &CleanupArgs, cli: &Cli) -> i32 {
    match run_cleanup_impl(args, cli) {
        Ok(deleted) => {
            write_output(
                &format!("Deleted {deleted} legacy metadata file(s)\n"),
                cli.quiet,
            );
            EXIT_SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

pub(crate) fn run_cleanup_impl(args: &CleanupArgs, cli: &Cli) -> Result<usize> {
    let config = resolve_scan_config(
        cli,
        ScanOverrides {
            roots: args.roots.clone(),
            ..ScanOverrides::default()
        },
    )?;
    let roots = config.require_roots()?;

    let quiet = cli.quiet;
    let sink = move |event: ScanEvent| {
        if !quiet {
            eprintln!("{}", format_event(&event));
        }
    };
    Ok(cleanup_legacy_metadata(roots, &config.classifier(), &sink))
}
