//! Builds a full [`ProjectRecord`] for one project directory.

mod credentials;
mod manifest;
mod readme;

pub use credentials::CredentialScanner;
pub use manifest::{
    ManifestInfo, parse_cargo_toml, parse_composer_json, parse_package_json, parse_pyproject,
    parse_requirements, read_manifests,
};
pub use readme::{README_CANDIDATES, ReadmeParser, ReadmeSummary};

use std::fs;
use std::path::Path;

use indexmap::IndexSet;

use crate::git::{GitCollector, GitInspector};
use crate::scanner::{PathClassifier, directory_sizes, latest_timestamps};
use crate::snapshot::ProjectRecord;
use crate::timestamp;
use crate::{Result, StowError};

/// Produces a fresh record for a project directory.
pub trait Extract: Sync {
    /// # Errors
    /// Returns an error when the directory itself cannot be read.
    fn extract(&self, directory: &Path) -> Result<ProjectRecord>;
}

/// Filesystem, manifest, README, credential and git extraction.
#[derive(Debug, Clone)]
pub struct MetadataExtractor<G: GitInspector = GitCollector> {
    classifier: PathClassifier,
    git: G,
    readme: ReadmeParser,
    credentials: CredentialScanner,
}

impl MetadataExtractor {
    #[must_use]
    pub fn new(classifier: PathClassifier) -> Self {
        Self::with_git(classifier, GitCollector::default())
    }
}

impl<G: GitInspector> MetadataExtractor<G> {
    #[must_use]
    pub fn with_git(classifier: PathClassifier, git: G) -> Self {
        Self {
            classifier,
            git,
            readme: ReadmeParser::new(),
            credentials: CredentialScanner::new(),
        }
    }

    #[must_use]
    pub const fn classifier(&self) -> &PathClassifier {
        &self.classifier
    }

    #[must_use]
    pub const fn git(&self) -> &G {
        &self.git
    }

    fn describe(&self, directory: &Path, record: &mut ProjectRecord) {
        let mut name: Option<String> = None;
        let mut description: Option<String> = None;
        let mut stack: IndexSet<String> = IndexSet::new();

        for manifest in read_manifests(directory) {
            if name.is_none() {
                name = manifest.name;
            }
            if description.is_none() {
                description = manifest.description;
            }
            stack.extend(manifest.dependencies);
        }

        if (name.is_none() || description.is_none())
            && let Some(readme) = self.readme.read(directory)
        {
            name = name.or(readme.title);
            description = description.or(readme.description);
        }

        if let Some(name) = name {
            record.project_name = name;
        }
        record.description = description;
        record.stack = stack.into_iter().collect();
    }
}

impl<G: GitInspector> Extract for MetadataExtractor<G> {
    fn extract(&self, directory: &Path) -> Result<ProjectRecord> {
        let read_err = |source| StowError::FileRead {
            path: directory.to_path_buf(),
            source,
        };
        let meta = fs::metadata(directory).map_err(read_err)?;
        fs::read_dir(directory).map_err(read_err)?;

        let mut record = ProjectRecord::new(directory);
        record.created = meta
            .created()
            .or_else(|_| meta.modified())
            .ok()
            .map(timestamp::from_system_time);

        let latest = latest_timestamps(&self.classifier, directory);
        record.last_accessed = latest.accessed.map(timestamp::from_system_time);
        record.last_modified = latest.modified.map(timestamp::from_system_time);

        self.describe(directory, &mut record);
        record.credentials = self.credentials.scan(directory);

        let sizes = directory_sizes(&self.classifier, directory);
        record.set_sizes(sizes.content_bytes, sizes.libs_bytes);
        record.file_types = sizes.file_types;

        record.git_info = self.git.inspect(directory);
        Ok(record)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
