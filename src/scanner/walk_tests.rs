use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use filetime::{FileTime, set_file_mtime};
use tempfile::TempDir;

use super::*;

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn at(secs: i64) -> FileTime {
    FileTime::from_unix_time(secs, 0)
}

fn pin_all(root: &Path, secs: i64) {
    for entry in walkdir::WalkDir::new(root).min_depth(1) {
        let entry = entry.unwrap();
        set_file_mtime(entry.path(), at(secs)).unwrap();
    }
}

#[test]
fn latest_modified_is_newest_entry() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "package.json", b"{}");
    write(dir.path(), "src/app.js", b"x");
    pin_all(dir.path(), 1_000_000);
    set_file_mtime(dir.path().join("src/app.js"), at(2_000_000)).unwrap();

    let latest = latest_timestamps(&PathClassifier::default(), dir.path());
    let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(2_000_000);
    assert_eq!(latest.modified, Some(expected));
    assert!(latest.accessed.is_some());
}

#[test]
fn directories_count_towards_latest_modified() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/app.js", b"x");
    pin_all(dir.path(), 1_000_000);
    set_file_mtime(dir.path().join("src"), at(3_000_000)).unwrap();

    let latest = latest_timestamps(&PathClassifier::default(), dir.path());
    let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(3_000_000);
    assert_eq!(latest.modified, Some(expected));
}

#[test]
fn ignored_subtrees_do_not_affect_timestamps() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "index.js", b"x");
    write(dir.path(), "node_modules/pkg/index.js", b"x");
    write(dir.path(), "build/out.js", b"x");
    pin_all(dir.path(), 1_000_000);
    set_file_mtime(dir.path().join("node_modules/pkg/index.js"), at(5_000_000)).unwrap();
    set_file_mtime(dir.path().join("build/out.js"), at(5_000_000)).unwrap();

    let latest = latest_timestamps(&PathClassifier::default(), dir.path());
    let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
    assert_eq!(latest.modified, Some(expected));
}

#[test]
fn legacy_meta_file_does_not_affect_timestamps() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.py", b"x");
    write(dir.path(), LEGACY_META_FILENAME, b"{}");
    pin_all(dir.path(), 1_000_000);
    set_file_mtime(dir.path().join(LEGACY_META_FILENAME), at(9_000_000)).unwrap();

    let latest = latest_timestamps(&PathClassifier::default(), dir.path());
    let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
    assert_eq!(latest.modified, Some(expected));
}

#[test]
fn empty_or_missing_directory_has_no_timestamps() {
    let dir = TempDir::new().unwrap();
    let classifier = PathClassifier::default();
    assert_eq!(latest_timestamps(&classifier, dir.path()), LatestTimestamps::default());
    assert_eq!(
        latest_timestamps(&classifier, &dir.path().join("missing")),
        LatestTimestamps::default()
    );
}

#[test]
fn base_with_ignored_name_is_still_walked() {
    let outer = TempDir::new().unwrap();
    let project = outer.path().join("build");
    write(&project, "main.c", b"int main;");

    let sizes = directory_sizes(&PathClassifier::default(), &project);
    assert_eq!(sizes.content_bytes, 9);
    assert_eq!(sizes.libs_bytes, 0);
    assert!(latest_timestamps(&PathClassifier::default(), &project).modified.is_some());
}

#[test]
fn sizes_split_content_and_sticky_libs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/app.js", b"0123456789");
    write(dir.path(), "node_modules/lib.js", b"abcde");
    write(dir.path(), "node_modules/nested/real/deep.js", b"abc");

    let sizes = directory_sizes(&PathClassifier::default(), dir.path());
    assert_eq!(sizes.content_bytes, 10);
    assert_eq!(sizes.libs_bytes, 8);
    assert_eq!(sizes.total_bytes(), 18);
    assert_eq!(sizes.file_types.get(".js"), Some(&1));
}

#[test]
fn builder_directory_is_content() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "builder/tool.rs", b"1234");
    write(dir.path(), "build/out.o", b"12");

    let sizes = directory_sizes(&PathClassifier::default(), dir.path());
    assert_eq!(sizes.content_bytes, 4);
    assert_eq!(sizes.libs_bytes, 2);
    assert_eq!(sizes.file_types.get(".rs"), Some(&1));
    assert!(!sizes.file_types.contains_key(".o"));
}

#[test]
fn file_types_use_lowercase_extension_or_sentinel() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "README.MD", b"#");
    write(dir.path(), "docs/guide.md", b"#");
    write(dir.path(), "Makefile", b"all:");
    write(dir.path(), ".env", b"A=1");

    let sizes = directory_sizes(&PathClassifier::default(), dir.path());
    assert_eq!(sizes.file_types.get(".md"), Some(&2));
    assert_eq!(sizes.file_types.get(NO_EXTENSION), Some(&2));
}

#[test]
fn sizes_skip_legacy_meta_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"abc");
    write(dir.path(), LEGACY_META_FILENAME, b"{\"big\":true}");

    let sizes = directory_sizes(&PathClassifier::default(), dir.path());
    assert_eq!(sizes.content_bytes, 3);
    assert_eq!(sizes.file_types.get(".json"), None);
}

#[test]
fn snapshot_writes_inside_project_do_not_move_timestamps() {
    let dir = TempDir::new().unwrap();
    let project = dunce::canonicalize(dir.path()).unwrap();
    write(&project, "package.json", b"{}");
    write(&project, "data/seed.json", b"[]");
    pin_all(&project, 1_000_000);

    let snapshot = project.join("data/projects.jsonl");
    let classifier = PathClassifier::default().with_snapshot(&snapshot);
    for _ in 0..2 {
        crate::state::atomic_write_with_lock(&snapshot, b"{}\n", 1000).unwrap();
    }

    let latest = latest_timestamps(&classifier, &project);
    let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
    assert_eq!(latest.modified, Some(expected));

    set_file_mtime(project.join("data/seed.json"), at(2_000_000)).unwrap();
    let latest = latest_timestamps(&classifier, &project);
    let expected = SystemTime::UNIX_EPOCH + Duration::from_secs(2_000_000);
    assert_eq!(latest.modified, Some(expected));
}

#[test]
fn extension_key_examples() {
    assert_eq!(extension_key(Path::new("a/b.TS")), ".ts");
    assert_eq!(extension_key(Path::new("a.tar.gz")), ".gz");
    assert_eq!(extension_key(Path::new("LICENSE")), NO_EXTENSION);
    assert_eq!(extension_key(Path::new(".gitignore")), NO_EXTENSION);
}
