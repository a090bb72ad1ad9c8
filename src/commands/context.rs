use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::Cli;
use crate::config::{
    Config, ConfigLoader, FileConfigLoader, FileSystem, LoadResult, RealFileSystem,
    SCAN_ROOTS_ENV, ScanConfig, ScanOverrides,
};
use crate::snapshot::SnapshotStore;
use crate::{EXIT_CONFIG_ERROR, Result, StowError, state};

/// Load configuration honouring `--config` and `--no-config`.
///
/// # Errors
/// Returns an error if an explicit file is missing or any found file cannot be
/// read or parsed.
pub(crate) fn load_config(config_path: Option<&Path>, no_config: bool) -> Result<LoadResult> {
    if no_config {
        return Ok(LoadResult {
            config: Config::default(),
            source: None,
        });
    }

    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    RealFileSystem.home_dir()
}

/// Build the effective scan configuration for one invocation.
///
/// The `SCAN_ROOTS` variable is read here, once, and handed down as a value.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or holds unusable
/// values.
pub(crate) fn resolve_scan_config(cli: &Cli, overrides: ScanOverrides) -> Result<ScanConfig> {
    let loaded = load_config(cli.config.as_deref(), cli.no_config)?;
    let overrides = ScanOverrides {
        snapshot: overrides.snapshot.or_else(|| cli.snapshot.clone()),
        env_roots: overrides
            .env_roots
            .or_else(|| std::env::var(SCAN_ROOTS_ENV).ok()),
        ..overrides
    };
    loaded.config.to_scan_config(
        &overrides,
        home_dir().as_deref(),
        &state::default_snapshot_path(),
    )
}

/// Snapshot store at the effective snapshot path.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded.
pub(crate) fn open_store(cli: &Cli) -> Result<(SnapshotStore, LoadResult)> {
    let loaded = load_config(cli.config.as_deref(), cli.no_config)?;
    let path = loaded.config.snapshot_path(
        cli.snapshot.as_deref(),
        home_dir().as_deref(),
        &state::default_snapshot_path(),
    );
    Ok((SnapshotStore::new(path), loaded))
}

/// Print to stdout unless quiet.
pub(crate) fn write_output(content: &str, quiet: bool) {
    if !quiet {
        print!("{content}");
    }
}

pub(crate) fn report_error(error: &StowError) -> i32 {
    debug!(kind = error.error_type(), "command failed");
    eprintln!("Error: {error}");
    EXIT_CONFIG_ERROR
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
