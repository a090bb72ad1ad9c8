mod filesystem;
mod loader;
mod model;

pub use filesystem::{FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LoadResult};
pub use model::{Config, SCAN_ROOTS_ENV, ScanConfig, ScanOverrides, expand_home};
