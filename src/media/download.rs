use crate::media::fetcher::MediaFetcher;
use crate::media::item::{FailureKind, MediaItem};
use crate::media::transcoder::Transcoder;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

const LOG_TARGET: &str = "voxbot::media::download";

/// Runs one fetch + transcode task per submitted item and publishes the
/// outcome back onto the item.
///
/// Tasks are independent of each other; only the semaphore bounds how many
/// run at once. No retries happen here, and nobody is notified directly:
/// the playback loop observes `MediaItem::status`.
pub struct DownloadSupervisor {
    fetcher: Arc<dyn MediaFetcher>,
    transcoder: Arc<dyn Transcoder>,
    permits: Arc<Semaphore>,
}

impl DownloadSupervisor {
    pub fn new(
        fetcher: Arc<dyn MediaFetcher>,
        transcoder: Arc<dyn Transcoder>,
        max_concurrent: usize,
    ) -> Self {
        DownloadSupervisor {
            fetcher,
            transcoder,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Spawns the download task for `item` and returns immediately.
    ///
    /// The handle is only needed by tests; callers normally drop it.
    #[instrument(skip(self, item), fields(item_id = %item.id(), url = %item.source_url()))]
    pub fn submit(&self, item: Arc<MediaItem>) -> JoinHandle<()> {
        let fetcher = self.fetcher.clone();
        let transcoder = self.transcoder.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            // The semaphore is never closed, so acquire cannot fail.
            let _permit = permits.acquire_owned().await.expect("semaphore closed");

            item.mark_fetching();
            info!(target: LOG_TARGET, item_id = %item.id(), url = %item.source_url(), "Starting fetch");

            let raw_path = match fetcher.fetch(item.source_url()).await {
                Ok(path) => path,
                Err(e) => {
                    error!(target: LOG_TARGET, item_id = %item.id(), "Fetch failed: {}", e);
                    item.mark_failed(FailureKind::Fetch(e.to_string()));
                    return;
                }
            };

            match transcoder.convert(&raw_path).await {
                Ok(playable_path) => {
                    debug!(target: LOG_TARGET, item_id = %item.id(), path = %playable_path.display(), "Item ready");
                    item.mark_ready(playable_path);
                }
                Err(e) => {
                    error!(target: LOG_TARGET, item_id = %item.id(), "Transcode failed: {}", e);
                    item.mark_failed(FailureKind::Transcode(e.to_string()));
                }
            }
        })
    }
}
