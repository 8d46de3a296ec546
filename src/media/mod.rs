//! Media acquisition pipeline: queued items, fetch/transcode collaborators
//! and the concurrent download supervisor.

pub mod download;
pub mod error;
pub mod fetcher;
pub mod item;
pub mod queue;
pub mod transcoder;

pub use download::DownloadSupervisor;
pub use error::MediaError;
pub use fetcher::{HttpFetcher, MediaFetcher, SourceRouter, YtDlpFetcher};
pub use item::{DownloadStatus, FailureKind, MediaItem};
pub use queue::PlaybackQueue;
pub use transcoder::{FfmpegTranscoder, Transcoder};
