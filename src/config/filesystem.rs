//! Filesystem abstraction for testability.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::state;

/// Filesystem and environment lookups used while loading configuration.
pub trait FileSystem {
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn exists(&self, path: &Path) -> bool;

    /// # Errors
    /// Returns an error if the current directory cannot be determined.
    fn current_dir(&self) -> std::io::Result<PathBuf>;

    /// Platform configuration directory for stow:
    /// - Linux: `~/.config/stow`
    /// - macOS: `~/Library/Application Support/stow`
    /// - Windows: `%APPDATA%\stow\config`
    fn config_dir(&self) -> Option<PathBuf>;

    fn home_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn config_dir(&self) -> Option<PathBuf> {
        state::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }
}
