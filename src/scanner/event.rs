//! Progress events emitted while scanning, persisting and cleaning up.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize, Serializer};

/// One progress record. Serialized with a `type` tag so a front end can forward
/// it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScanEvent {
    /// The project was (re-)extracted.
    Updated {
        directory: PathBuf,
        #[serde(rename = "processingTime")]
        processing_time: f64,
    },
    /// The cached record was reused.
    Existing {
        directory: PathBuf,
        #[serde(rename = "processingTime")]
        processing_time: f64,
    },
    Error {
        #[serde(serialize_with = "serialize_lossy")]
        directory: PathBuf,
        error: String,
    },
    Complete {
        #[serde(rename = "totalTime")]
        total_time: f64,
        count: usize,
    },
    /// The snapshot file was written.
    Synced { file: PathBuf },
    /// A legacy per-project cache file was removed.
    Deleted { file: PathBuf },
}

/// Error events may name directories that are not valid UTF-8.
fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

impl ScanEvent {
    /// Directory the event is about, for per-project events.
    #[must_use]
    pub const fn directory(&self) -> Option<&PathBuf> {
        match self {
            Self::Updated { directory, .. }
            | Self::Existing { directory, .. }
            | Self::Error { directory, .. } => Some(directory),
            _ => None,
        }
    }
}

/// Receives progress events. Implementations must tolerate calls from several
/// worker threads.
pub trait ProgressSink: Sync {
    fn emit(&self, event: ScanEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ScanEvent) + Sync,
{
    fn emit(&self, event: ScanEvent) {
        self(event);
    }
}

/// Forwards events over a channel; a dropped receiver is ignored.
impl ProgressSink for Sender<ScanEvent> {
    fn emit(&self, event: ScanEvent) {
        let _ = self.send(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _event: ScanEvent) {}
}

/// Collects events in memory in emission order.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ScanEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn into_events(self) -> Vec<ScanEvent> {
        self.events.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressSink for EventLog {
    fn emit(&self, event: ScanEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Cooperative cancellation flag shared between the caller and a scan.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
