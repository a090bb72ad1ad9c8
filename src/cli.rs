use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::{EventFormat, OutputFormat};
use crate::snapshot::{DEFAULT_SEARCH_LIMIT, DirtyKind};

#[derive(Parser, Debug)]
#[command(name = "stow")]
#[command(author, version, about = "Incremental project inventory for a local dev dashboard")]
#[command(long_about = "Scans directory trees for leaf projects, extracts metadata \
    (stack, sizes, git state) and keeps it in a newline-delimited JSON snapshot.\n\n\
    Exit codes:\n  \
    0 - Success\n  \
    1 - Scan finished but some projects failed\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// Snapshot file (default: platform data dir)
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan roots for projects and update the snapshot
    Scan(ScanArgs),

    /// Delete legacy per-project metadata files
    Cleanup(CleanupArgs),

    /// Re-read git state for projects already in the snapshot
    Refresh(RefreshArgs),

    /// Search the snapshot by name, directory, description or stack
    Search(SearchArgs),

    /// Show one project with its live git status
    Show(ShowArgs),

    /// List projects with uncommitted changes or out of sync with upstream
    Dirty(DirtyArgs),

    /// Summary over the whole snapshot
    Stats(StatsArgs),

    /// Configuration file utilities
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Root directories to scan (overrides config and SCAN_ROOTS)
    pub roots: Vec<PathBuf>,

    /// Extra ignore patterns (comma-separated or repeated)
    #[arg(short, long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Re-extract every project regardless of modification times
    #[arg(short, long)]
    pub force: bool,

    /// Number of projects extracted in parallel
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Scan without writing the snapshot
    #[arg(long)]
    pub no_sync: bool,

    /// Progress event format
    #[arg(long, value_enum, default_value = "text")]
    pub events: EventFormat,
}

#[derive(Parser, Debug)]
pub struct CleanupArgs {
    /// Root directories to clean (default: configured roots)
    pub roots: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct RefreshArgs {
    /// Project names or directory fragments
    #[arg(required_unless_present = "all")]
    pub names: Vec<String>,

    /// Refresh every git project in the snapshot
    #[arg(long, conflicts_with = "names")]
    pub all: bool,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Text matched against name, directory, description and stack
    pub query: Option<String>,

    /// Only projects whose stack contains this entry
    #[arg(long)]
    pub stack: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: usize,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Project name or directory fragment
    pub name: String,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct DirtyArgs {
    /// Which kind of divergence to list
    #[arg(short, long, value_enum, default_value = "all")]
    pub kind: DirtyKind,

    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Output format [possible values: text, json]
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Check that a configuration file parses and its values are usable
    Validate {
        /// Path to configuration file (default: .stow.toml)
        #[arg(default_value = ".stow.toml")]
        path: PathBuf,
    },

    /// Display the effective configuration
    Show {
        /// Output format [possible values: text, json]
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
