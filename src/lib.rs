pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod scanner;
pub mod snapshot;
pub mod state;
pub mod timestamp;

pub use error::{Result, StowError};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PROJECT_ERRORS: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Scan stopped by Ctrl-C; nothing was persisted.
pub const EXIT_INTERRUPTED: i32 = 130;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
