use std::path::{Path, PathBuf};

use tracing::debug;

use super::Config;
use super::filesystem::{FileSystem, RealFileSystem};
use crate::{Result, StowError};

/// A parsed configuration and the file it came from (`None` for defaults).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub config: Config,
    pub source: Option<PathBuf>,
}

pub trait ConfigLoader {
    /// Load from the first file found in the search order.
    ///
    /// # Errors
    /// Returns an error if a found file cannot be read or parsed.
    fn load(&self) -> Result<LoadResult>;

    /// Load from an explicit path, which must exist.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn load_from_path(&self, path: &Path) -> Result<LoadResult>;
}

const LOCAL_CONFIG_NAME: &str = ".stow.toml";
const USER_CONFIG_NAME: &str = "config.toml";

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.stow.toml` in the current directory
/// 2. `config.toml` in the platform user config directory
/// 3. `Config::default()`
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    #[must_use]
    pub const fn fs(&self) -> &F {
        &self.fs
    }

    fn local_config_path(&self) -> Option<PathBuf> {
        self.fs
            .current_dir()
            .ok()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.fs.config_dir().map(|dir| dir.join(USER_CONFIG_NAME))
    }

    fn read_config(&self, path: &Path) -> Result<LoadResult> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| StowError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(LoadResult {
            config,
            source: Some(path.to_path_buf()),
        })
    }
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<LoadResult> {
        let candidates = [self.local_config_path(), self.user_config_path()];
        for path in candidates.into_iter().flatten() {
            if self.fs.exists(&path) {
                return self.read_config(&path);
            }
        }
        Ok(LoadResult {
            config: Config::default(),
            source: None,
        })
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        if !self.fs.exists(path) {
            return Err(StowError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        self.read_config(path)
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
