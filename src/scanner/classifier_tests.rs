use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;

#[test]
fn ignores_exact_segment() {
    let classifier = PathClassifier::default();
    assert!(classifier.is_ignored(Path::new("/home/me/app/node_modules/react")));
    assert!(classifier.is_ignored(Path::new("app/build")));
    assert!(classifier.is_ignored(Path::new("build")));
}

#[test]
fn does_not_match_inside_segment() {
    let classifier = PathClassifier::default();
    assert!(!classifier.is_ignored(Path::new("/home/me/builder")));
    assert!(!classifier.is_ignored(Path::new("/home/me/rebuild/src")));
    assert!(!classifier.is_ignored(Path::new("/home/me/distant")));
}

#[test]
fn matching_is_case_insensitive() {
    let classifier = PathClassifier::default();
    assert!(classifier.is_ignored(Path::new("/x/Node_Modules/y")));
    assert!(classifier.is_ignored(Path::new("/x/BUILD")));

    let custom = PathClassifier::with_patterns(["Vendor"]);
    assert!(custom.is_ignored(Path::new("php/vendor/autoload.php")));
}

#[test]
fn backslash_paths_are_normalized() {
    let classifier = PathClassifier::default();
    assert!(classifier.is_ignored(Path::new(r"C:\work\app\node_modules\x")));
    assert!(!classifier.is_ignored(Path::new(r"C:\work\builder")));
}

#[test]
fn multi_segment_patterns_match_runs() {
    let classifier = PathClassifier::with_patterns(["docs/generated"]);
    assert!(classifier.is_ignored(Path::new("app/docs/generated/api.html")));
    assert!(!classifier.is_ignored(Path::new("app/docs/api.html")));
    assert!(!classifier.is_ignored(Path::new("app/generated")));
}

#[test]
fn extra_patterns_extend_defaults() {
    let classifier = PathClassifier::new(["vendor", "target"]);
    assert!(classifier.is_ignored(Path::new("a/vendor/b")));
    assert!(classifier.is_ignored(Path::new("a/target")));
    assert!(classifier.is_ignored(Path::new("a/.git")));
    assert!(classifier.patterns().len() == DEFAULT_IGNORE_PATTERNS.len() + 2);
}

#[test]
fn duplicate_and_empty_patterns_are_dropped() {
    let classifier = PathClassifier::with_patterns(["build", "BUILD", "", "/"]);
    assert_eq!(classifier.patterns(), ["build"]);
}

#[test]
fn base_is_never_ignored() {
    let classifier = PathClassifier::default();
    let base = Path::new("/srv/build/projects");
    assert!(!classifier.is_ignored_below(base, base));
    assert!(!classifier.is_ignored_below(base, &base.join("app")));
    assert!(classifier.is_ignored_below(base, &base.join("app/dist")));
}

#[test]
fn project_directory_detects_indicators() {
    let dir = TempDir::new().unwrap();
    let classifier = PathClassifier::default();
    assert!(!classifier.is_project_directory(dir.path()));

    fs::write(dir.path().join("pyproject.toml"), "").unwrap();
    assert!(classifier.is_project_directory(dir.path()));
}

#[test]
fn project_directory_detects_git_marker_and_readme() {
    let classifier = PathClassifier::default();

    let repo = TempDir::new().unwrap();
    fs::create_dir(repo.path().join(".git")).unwrap();
    assert!(classifier.is_project_directory(repo.path()));

    let docs = TempDir::new().unwrap();
    fs::write(docs.path().join("README.md"), "# Notes").unwrap();
    assert!(classifier.is_project_directory(docs.path()));
}

#[test]
fn unrelated_files_are_not_indicators() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "").unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    assert!(!PathClassifier::default().is_project_directory(dir.path()));
}

#[test]
fn every_readme_name_marks_a_project() {
    for name in crate::metadata::README_CANDIDATES {
        assert!(PROJECT_INDICATORS.contains(name), "{name} is not an indicator");
    }

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("readme.md"), "# notes").unwrap();
    assert!(PathClassifier::default().is_project_directory(dir.path()));
}

#[test]
fn snapshot_files_are_recognized_beside_the_snapshot() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    let canonical = dunce::canonicalize(&data).unwrap();

    let classifier = PathClassifier::default().with_snapshot(&data.join("projects.jsonl"));
    assert_eq!(classifier.snapshot(), Some(canonical.join("projects.jsonl").as_path()));
    assert!(classifier.is_snapshot_file(&canonical.join("projects.jsonl")));
    assert!(classifier.is_snapshot_file(&canonical.join("projects.jsonl.lock")));
    assert!(classifier.is_snapshot_file(&canonical.join(".projects.jsonl.tmpXyZ123")));
    assert!(!classifier.is_snapshot_file(&canonical.join("seed.json")));
    assert!(classifier.is_snapshot_dir(&canonical));
    assert!(!classifier.is_snapshot_dir(&dunce::canonicalize(dir.path()).unwrap()));
}

#[test]
fn without_snapshot_nothing_is_bookkeeping() {
    let classifier = PathClassifier::default();
    assert_eq!(classifier.snapshot(), None);
    assert!(!classifier.is_snapshot_file(Path::new("/data/projects.jsonl")));
    assert!(!classifier.is_snapshot_dir(Path::new("/data")));
}
