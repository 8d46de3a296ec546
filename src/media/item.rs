use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;
use uuid::Uuid;

const LOG_TARGET: &str = "voxbot::media::item";

/// The stage at which a download attempt gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Fetch(String),
    Transcode(String),
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Fetch(s) => write!(f, "fetch: {}", s),
            FailureKind::Transcode(s) => write!(f, "transcode: {}", s),
        }
    }
}

/// Lifecycle of a queued media request. Transitions are forward-only:
/// Pending -> Fetching -> Ready | Failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    Pending,
    Fetching,
    Ready(PathBuf),
    Failed(FailureKind),
}

impl DownloadStatus {
    /// True once the download reached a terminal state (Ready or Failed).
    pub fn is_settled(&self) -> bool {
        matches!(self, DownloadStatus::Ready(_) | DownloadStatus::Failed(_))
    }
}

/// One queued playback request and its download state.
///
/// Shared as `Arc<MediaItem>` between the enqueueing command, the download
/// task (sole writer) and the playback loop (reader).
#[derive(Debug)]
pub struct MediaItem {
    id: Uuid,
    source_url: String,
    status: Mutex<DownloadStatus>,
}

impl MediaItem {
    pub fn new(source_url: &str) -> Arc<Self> {
        Arc::new(MediaItem {
            id: Uuid::new_v4(),
            source_url: source_url.to_string(),
            status: Mutex::new(DownloadStatus::Pending),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Snapshot of the current download status.
    pub fn status(&self) -> DownloadStatus {
        self.status.lock().unwrap().clone()
    }

    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }

    /// Marks the item as being fetched. Only valid from Pending.
    pub fn mark_fetching(&self) {
        let mut status = self.status.lock().unwrap();
        match *status {
            DownloadStatus::Pending => *status = DownloadStatus::Fetching,
            ref s => warn!(target: LOG_TARGET, item_id = %self.id, "Ignoring mark_fetching from non-pending state {:?}", s),
        }
    }

    /// Publishes the playable file path. Ignored once settled.
    pub fn mark_ready(&self, path: PathBuf) {
        let mut status = self.status.lock().unwrap();
        if status.is_settled() {
            warn!(target: LOG_TARGET, item_id = %self.id, "Ignoring mark_ready on settled item");
            return;
        }
        *status = DownloadStatus::Ready(path);
    }

    /// Records a terminal failure. Ignored once settled.
    pub fn mark_failed(&self, kind: FailureKind) {
        let mut status = self.status.lock().unwrap();
        if status.is_settled() {
            warn!(target: LOG_TARGET, item_id = %self.id, "Ignoring mark_failed on settled item");
            return;
        }
        *status = DownloadStatus::Failed(kind);
    }
}
