mod cleanup;
mod config;
mod context;
mod query;
mod refresh;
mod scan;

pub use cleanup::run_cleanup;
pub use config::run_config;
pub use query::{run_dirty, run_search, run_show, run_stats};
pub use refresh::run_refresh;
pub use scan::run_scan;
