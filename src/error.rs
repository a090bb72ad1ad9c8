use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Snapshot is locked by another writer: {}", .0.display())]
    SnapshotLocked(PathBuf),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),
}

impl StowError {
    /// Short, stable name of the error variant.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::FileRead { .. } => "FileRead",
            Self::FileWrite { .. } => "FileWrite",
            Self::Io(_) => "Io",
            Self::TomlParse(_) => "TomlParse",
            Self::Json(_) => "Json",
            Self::Git(_) => "Git",
            Self::SnapshotLocked(_) => "SnapshotLocked",
            Self::ProjectNotFound(_) => "ProjectNotFound",
        }
    }
}

pub type Result<T> = std::result::Result<T, StowError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
