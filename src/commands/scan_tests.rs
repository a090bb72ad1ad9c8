use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tempfile::TempDir;

use super::*;
use crate::cli::Commands;
use crate::snapshot::SnapshotStore;

fn project(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name": "{name}", "dependencies": {{"express": "^4"}}}}"#),
    )
    .unwrap();
    fs::write(dir.join("src/index.js"), "console.log(1);\n").unwrap();
}

fn run(args: &[&str]) -> Result<i32> {
    let cli = Cli::parse_from(std::iter::once("stow").chain(args.iter().copied()));
    let Commands::Scan(scan) = &cli.command else {
        panic!("Expected Scan command");
    };
    run_scan_impl(scan, &cli)
}

#[test]
fn scan_writes_snapshot() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("code");
    project(&root, "alpha");
    project(&root, "beta");
    let snapshot = temp.path().join("data/projects.jsonl");

    let root_arg = root.to_string_lossy().into_owned();
    let snapshot_arg = snapshot.to_string_lossy().into_owned();
    let code = run(&["-q", "--no-config", "-s", &snapshot_arg, "scan", &root_arg]).unwrap();
    assert_eq!(code, EXIT_SUCCESS);

    let loaded = SnapshotStore::new(&snapshot).load();
    let names: Vec<&str> = loaded
        .records()
        .iter()
        .map(|r| r.project_name.as_str())
        .collect();
    assert_eq!(names, vec!["alpha", "beta"]);
}

#[test]
fn scan_no_sync_leaves_snapshot_untouched() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("code");
    project(&root, "alpha");
    let snapshot = temp.path().join("projects.jsonl");

    let root_arg = root.to_string_lossy().into_owned();
    let snapshot_arg = snapshot.to_string_lossy().into_owned();
    let code = run(&[
        "-q",
        "--no-config",
        "-s",
        &snapshot_arg,
        "scan",
        &root_arg,
        "--no-sync",
    ])
    .unwrap();

    assert_eq!(code, EXIT_SUCCESS);
    assert!(!snapshot.exists());
}

#[test]
fn scan_without_roots_is_a_config_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("stow.toml");
    fs::write(&config, "").unwrap();
    let config_arg = config.to_string_lossy().into_owned();

    // SCAN_ROOTS may be set in the environment; only assert when it is not.
    if std::env::var_os(crate::config::SCAN_ROOTS_ENV).is_none() {
        assert!(run(&["-q", "--config", &config_arg, "scan"]).is_err());
    }
}

#[test]
fn summary_line() {
    let report = ScanReport {
        updated: 2,
        existing: 5,
        errors: 1,
        elapsed: Duration::from_millis(1300),
        ..ScanReport::default()
    };
    assert_eq!(
        format_summary(&report),
        "Scanned 0 projects (2 updated, 5 existing, 1 errors) in 1.3s\n"
    );
}
