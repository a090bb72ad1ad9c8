#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the stow binary.
#[macro_export]
macro_rules! stow {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("stow"))
    };
}

/// Scratch tree with a `code/` scan root and a snapshot path next to it.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        fixture.create_dir("code");
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Scan root. Canonical so it compares equal to scanner output.
    pub fn root(&self) -> PathBuf {
        dunce::canonicalize(self.path().join("code")).expect("root exists")
    }

    pub fn snapshot(&self) -> PathBuf {
        self.path().join("data").join("projects_metadata.jsonl")
    }

    /// Creates a file below the scan root.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.path().join("code").join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Creates a directory below the fixture root.
    pub fn create_dir(&self, relative_path: &str) -> PathBuf {
        let path = self.path().join(relative_path);
        fs::create_dir_all(&path).expect("Failed to create directory");
        path
    }

    /// A node project at `code/<relative_path>` with one source file.
    pub fn create_node_project(&self, relative_path: &str) -> PathBuf {
        let name = relative_path.rsplit('/').next().unwrap_or(relative_path);
        self.create_file(
            &format!("{relative_path}/package.json"),
            &format!(r#"{{"name": "{name}", "dependencies": {{"express": "^4.18.0"}}}}"#),
        );
        self.create_file(&format!("{relative_path}/src/index.js"), "console.log('hi');\n");
        self.root().join(relative_path)
    }

    /// Pin every file and directory below the scan root to one mtime so the
    /// next change is unambiguous.
    pub fn settle(&self, at: SystemTime) {
        let time = FileTime::from_system_time(at);
        for entry in walkdir::WalkDir::new(self.root()) {
            let entry = entry.expect("walk fixture");
            filetime::set_file_mtime(entry.path(), time).expect("set mtime");
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixed point in the past, far from "now".
pub fn an_hour_ago() -> SystemTime {
    SystemTime::now() - Duration::from_secs(3600)
}

pub fn touch(path: &Path, at: SystemTime) {
    filetime::set_file_mtime(path, FileTime::from_system_time(at)).expect("set mtime");
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// Run git in `dir` with a fixed identity and no user config.
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("HOME", dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("spawn git");
    assert!(status.success(), "git {args:?} failed");
}
