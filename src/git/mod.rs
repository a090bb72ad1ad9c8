mod collector;
mod info;
mod status;

pub use collector::{GitCollector, GitInspector};
pub use info::{
    CommitEntry, GitInfo, HISTORY_LIMIT, HistorySummary, Identity, RepositorySummary,
    UNKNOWN_BRANCH, UNKNOWN_IDENTITY,
};
pub use status::{DEFAULT_GIT_TIMEOUT, StatusProbe, WorkingTreeStatus};
