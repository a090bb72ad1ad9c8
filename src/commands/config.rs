use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use crate::cli::{Cli, ConfigAction, ConfigArgs};
use crate::config::{ConfigLoader, FileConfigLoader, ScanConfig, ScanOverrides};
use crate::output::OutputFormat;
use crate::{EXIT_CONFIG_ERROR, EXIT_SUCCESS, Result, state};

use super::context::{home_dir, load_config, report_error, resolve_scan_config, write_output};

#[must_use]
pub fn run_config(args: &ConfigArgs, cli: &Cli) -> i32 {
    match &args.action {
        ConfigAction::Validate { path } => run_config_validate(path),
        ConfigAction::Show { format } => match run_config_show_impl(*format, cli) {
            Ok(output) => {
                write_output(&output, cli.quiet);
                EXIT_SUCCESS
            }
            Err(e) => report_error(&e),
        },
    }
}

fn run_config_validate(path: &Path) -> i32 {
    match run_config_validate_impl(path) {
        Ok(()) => {
            println!("Configuration is valid: {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            EXIT_CONFIG_ERROR
        }
    }
}

/// Parse `path` and check its values the way a scan would.
///
/// # Errors
/// Returns an error if the file is missing, is not valid TOML, has unknown
/// keys, or holds values a scan would reject.
pub(crate) fn run_config_validate_impl(path: &Path) -> Result<()> {
    let loaded = FileConfigLoader::new().load_from_path(path)?;
    loaded.config.to_scan_config(
        &ScanOverrides::default(),
        home_dir().as_deref(),
        &state::default_snapshot_path(),
    )?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    source: Option<&'a Path>,
    #[serde(flatten)]
    scan: &'a ScanConfig,
    ignore_patterns: &'a [String],
}

/// # Errors
/// Returns an error if the configuration cannot be loaded or is invalid.
pub(crate) fn run_config_show_impl(format: OutputFormat, cli: &Cli) -> Result<String> {
    let loaded = load_config(cli.config.as_deref(), cli.no_config)?;
    let scan = resolve_scan_config(cli, ScanOverrides::default())?;
    let classifier = scan.classifier();
    let view = EffectiveConfig {
        source: loaded.source.as_deref(),
        scan: &scan,
        ignore_patterns: classifier.patterns(),
    };

    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&view)?)),
        OutputFormat::Text => Ok(format_config_text(&view)),
    }
}

fn format_config_text(view: &EffectiveConfig<'_>) -> String {
    let mut output = String::from("=== Effective Configuration ===\n\n");

    match view.source {
        Some(path) => {
            let _ = writeln!(output, "source = {}", path.display());
        }
        None => output.push_str("source = (defaults)\n"),
    }
    if view.scan.roots.is_empty() {
        output.push_str("roots = []\n");
    } else {
        output.push_str("roots = [\n");
        for root in &view.scan.roots {
            let _ = writeln!(output, "  \"{}\",", root.display());
        }
        output.push_str("]\n");
    }
    let _ = writeln!(output, "snapshot = {}", view.scan.snapshot.display());
    let _ = writeln!(output, "jobs = {}", view.scan.jobs);
    let _ = writeln!(
        output,
        "git_timeout_secs = {}",
        view.scan.git_timeout.as_secs()
    );
    let _ = writeln!(output, "ignore = {:?}", view.ignore_patterns);

    output
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
