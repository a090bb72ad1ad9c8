//! The persisted project inventory.

mod query;
mod record;
mod store;

pub use query::{
    DEFAULT_SEARCH_LIMIT, DirtyKind, DirtyProject, SearchQuery, SnapshotStats, TOP_STACK_ENTRIES,
    dirty, find_project, search, stats,
};
pub use record::{ProjectRecord, basename};
pub use store::{Snapshot, SnapshotStore, parse_lines, serialize_lines};
