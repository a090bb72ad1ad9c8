use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::git::GitInfo;
use crate::timestamp;

/// One inventoried project, one line of the snapshot file.
///
/// Every field defaults when absent so lines written by older versions load.
/// Keys this type does not know are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectRecord {
    pub directory: PathBuf,

    #[serde(with = "timestamp::optional")]
    pub created: Option<DateTime<Utc>>,

    #[serde(with = "timestamp::optional")]
    pub last_accessed: Option<DateTime<Utc>>,

    /// Newest modification time below the project; drives staleness checks.
    #[serde(with = "timestamp::optional")]
    pub last_modified: Option<DateTime<Utc>>,

    pub project_name: String,
    pub description: Option<String>,
    pub stack: Vec<String>,
    pub file_types: BTreeMap<String, u64>,
    pub content_size_bytes: u64,
    pub libs_size_bytes: u64,
    pub total_size_bytes: u64,
    pub credentials: Vec<String>,
    pub git_info: GitInfo,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectRecord {
    /// Empty record for `directory`, named after its last path component.
    #[must_use]
    pub fn new(directory: &Path) -> Self {
        Self {
            directory: directory.to_path_buf(),
            project_name: basename(directory),
            ..Self::default()
        }
    }

    pub const fn set_sizes(&mut self, content: u64, libs: u64) {
        self.content_size_bytes = content;
        self.libs_size_bytes = libs;
        self.recompute_total();
    }

    /// `total_size_bytes` is always derived from the two buckets.
    pub const fn recompute_total(&mut self) {
        self.total_size_bytes = self.content_size_bytes.saturating_add(self.libs_size_bytes);
    }

    /// Case-insensitive substring match over name and directory.
    #[must_use]
    pub fn matches_name(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.project_name.to_lowercase().contains(&needle)
            || self
                .directory
                .to_string_lossy()
                .to_lowercase()
                .contains(&needle)
    }
}

#[must_use]
pub fn basename(directory: &Path) -> String {
    directory.file_name().map_or_else(
        || directory.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}
