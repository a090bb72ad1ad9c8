mod progress;
mod views;

pub use progress::{EventFormat, ScanProgress, format_event};
pub use views::{
    DetailView, SearchHit, render_dirty, render_project, render_search, render_stats,
};

use std::path::Path;

/// Output format for query commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

/// `1.23 MB` from one mebibyte up, `4.5 KB` below, `-` for zero.
#[must_use]
#[allow(clippy::cast_precision_loss)] // display only
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "-".to_string();
    }
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1.0 {
        format!("{mb:.2} MB")
    } else {
        format!("{kb:.1} KB")
    }
}

/// Last path component, for compact progress messages.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
