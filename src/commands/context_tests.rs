use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use super::*;
use crate::EXIT_CONFIG_ERROR;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("stow").chain(args.iter().copied()))
}

#[test]
fn load_config_no_config_returns_default() {
    let result = load_config(None, true).unwrap();
    assert_eq!(result.config, Config::default());
    assert!(result.source.is_none());
}

#[test]
fn load_config_explicit_missing_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("absent.toml");
    let err = load_config(Some(&missing), false).unwrap_err();
    assert!(matches!(err, StowError::Config(_)));
}

#[test]
fn load_config_explicit_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("stow.toml");
    std::fs::write(&path, "roots = [\"/code\"]\njobs = 3\n").unwrap();

    let result = load_config(Some(&path), false).unwrap();
    assert_eq!(result.config.roots, vec!["/code".to_string()]);
    assert_eq!(result.config.jobs, 3);
    assert_eq!(result.source, Some(path));
}

#[test]
fn resolve_scan_config_prefers_command_line() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("stow.toml");
    std::fs::write(&path, "roots = [\"/from-file\"]\nignore = [\"tmp\"]\n").unwrap();
    let config_arg = path.to_string_lossy().into_owned();
    let cli = cli(&["--config", &config_arg, "--snapshot", "/tmp/s.jsonl", "stats"]);

    let config = resolve_scan_config(
        &cli,
        ScanOverrides {
            roots: vec![PathBuf::from("/from-cli")],
            ignore: vec!["cache".to_string()],
            ..ScanOverrides::default()
        },
    )
    .unwrap();

    assert_eq!(config.roots, vec![PathBuf::from("/from-cli")]);
    assert_eq!(config.ignore, vec!["tmp".to_string(), "cache".to_string()]);
    assert_eq!(config.snapshot, PathBuf::from("/tmp/s.jsonl"));
}

#[test]
fn resolve_scan_config_rejects_zero_jobs() {
    let cli = cli(&["--no-config", "stats"]);
    let err = resolve_scan_config(
        &cli,
        ScanOverrides {
            jobs: Some(0),
            ..ScanOverrides::default()
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("jobs"));
}

#[test]
fn open_store_uses_snapshot_flag() {
    let cli = cli(&["--no-config", "-s", "/data/inventory.jsonl", "stats"]);
    let (store, loaded) = open_store(&cli).unwrap();
    assert_eq!(store.path(), Path::new("/data/inventory.jsonl"));
    assert!(loaded.source.is_none());
}

#[test]
fn report_error_maps_to_config_exit_code() {
    let code = report_error(&StowError::ProjectNotFound("api".to_string()));
    assert_eq!(code, EXIT_CONFIG_ERROR);
}
