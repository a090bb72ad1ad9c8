use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use regex::Regex;
use tracing::debug;

const ENV_FILE_PREFIX: &str = ".env";

/// Flags dotenv keys whose names look sensitive. Values are never kept.
#[derive(Debug, Clone)]
pub struct CredentialScanner {
    sensitive: Regex,
}

impl Default for CredentialScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialScanner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sensitive: Regex::new(r"(?i)token|secret|password|key|credentials")
                .expect("Invalid regex"),
        }
    }

    #[must_use]
    pub fn is_sensitive(&self, key: &str) -> bool {
        self.sensitive.is_match(key)
    }

    /// Sensitive key names from every `.env*` file directly inside `dir`.
    /// Files are read in name order and keys are reported once each.
    #[must_use]
    pub fn scan(&self, dir: &Path) -> Vec<String> {
        let mut keys: IndexSet<String> = IndexSet::new();
        for file in env_files(dir) {
            let iter = match dotenvy::from_path_iter(&file) {
                Ok(iter) => iter,
                Err(e) => {
                    debug!(path = %file.display(), "skipping env file: {e}");
                    continue;
                }
            };
            for item in iter {
                match item {
                    Ok((key, _value)) if self.is_sensitive(&key) => {
                        keys.insert(key);
                    }
                    Ok(_) => {}
                    Err(e) => debug!(path = %file.display(), "skipping env line: {e}"),
                }
            }
        }
        keys.into_iter().collect()
    }
}

fn env_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(ENV_FILE_PREFIX))
        .map(|entry| entry.path())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
