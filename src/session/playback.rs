use crate::audio::{AudioFrameEncoder, VoiceConnection};
use crate::media::{DownloadStatus, MediaItem};
use crate::session::connection::VoiceConnector;
use crate::session::VoiceSession;
use crate::ui::Notifier;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

const LOG_TARGET: &str = "voxbot::session::playback";

/// Collaborators the playback loop streams through.
#[derive(Clone)]
pub struct PlaybackDeps {
    pub encoder: Arc<dyn AudioFrameEncoder>,
    pub connector: Arc<dyn VoiceConnector>,
    pub notifier: Arc<dyn Notifier>,
    pub poll_interval: Duration,
}

/// Where playback happens and where its notices go.
#[derive(Debug, Clone)]
pub struct PlaybackContext {
    pub guild_id: String,
    pub channel_id: String,
}

/// Starts the playback loop for `session` unless one is already running.
///
/// Returns the loop's handle when this call claimed the slot, `None` when
/// an existing loop keeps serving the queue.
pub fn spawn_playback_loop(
    session: Arc<VoiceSession>,
    deps: PlaybackDeps,
    ctx: PlaybackContext,
) -> Option<JoinHandle<()>> {
    if !session.try_claim_playback() {
        debug!(target: LOG_TARGET, guild_id = %ctx.guild_id, "Playback loop already running");
        return None;
    }
    Some(tokio::spawn(run_playback_loop(session, deps, ctx)))
}

#[instrument(skip(session, deps, ctx), fields(guild_id = %ctx.guild_id))]
async fn run_playback_loop(session: Arc<VoiceSession>, deps: PlaybackDeps, ctx: PlaybackContext) {
    info!(target: LOG_TARGET, "Playback loop started");

    loop {
        if session.is_closed() {
            break;
        }

        let item = match session.queue().dequeue() {
            Some(item) => item,
            None => {
                session.release_playback();
                // An enqueue may have raced the release; only exit once the
                // queue is confirmed empty or another loop took the slot.
                if session.queue().is_empty() || !session.try_claim_playback() {
                    info!(target: LOG_TARGET, "Queue drained, playback loop idle");
                    return;
                }
                continue;
            }
        };

        deps.notifier
            .notify(
                &ctx.channel_id,
                &format!("🎶 Now playing: {}", item.source_url()),
            )
            .await;

        let status = match wait_for_settled(&session, &deps, &item).await {
            Some(status) => status,
            None => break,
        };

        match status {
            DownloadStatus::Ready(path) => {
                let connection = match session
                    .ensure_connected(&deps.connector, &ctx.channel_id)
                    .await
                {
                    Ok(connection) => connection,
                    Err(e) => {
                        error!(target: LOG_TARGET, item_id = %item.id(), "Could not join voice channel: {}", e);
                        deps.notifier
                            .notify(&ctx.channel_id, "⚠ Failed to join voice channel.")
                            .await;
                        break;
                    }
                };
                stream_item(&session, &deps, connection.as_ref(), &path).await;
            }
            DownloadStatus::Failed(kind) => {
                warn!(target: LOG_TARGET, item_id = %item.id(), "Skipping failed item: {}", kind);
                deps.notifier
                    .notify(
                        &ctx.channel_id,
                        &format!("⚠ Error downloading song: {}", item.source_url()),
                    )
                    .await;
            }
            // wait_for_settled only returns terminal states.
            other => {
                error!(target: LOG_TARGET, item_id = %item.id(), "Unexpected item status {:?}", other);
            }
        }
    }

    session.release_playback();
    info!(target: LOG_TARGET, "Playback loop stopped");
}

/// Polls the item until its download settles. Returns `None` when the
/// session is torn down while waiting.
async fn wait_for_settled(
    session: &VoiceSession,
    deps: &PlaybackDeps,
    item: &MediaItem,
) -> Option<DownloadStatus> {
    loop {
        if session.is_closed() {
            return None;
        }
        let status = item.status();
        if status.is_settled() {
            return Some(status);
        }
        tokio::select! {
            _ = session.wait_teardown() => return None,
            _ = tokio::time::sleep(deps.poll_interval) => {}
        }
    }
}

/// Streams one playable file frame by frame until it ends, fails, or the
/// session closes. Frame errors end the item, never the loop.
async fn stream_item(
    session: &VoiceSession,
    deps: &PlaybackDeps,
    connection: &dyn VoiceConnection,
    path: &Path,
) {
    let mut source = match deps.encoder.open(path).await {
        Ok(source) => source,
        Err(e) => {
            error!(target: LOG_TARGET, path = %path.display(), "Failed to open playable file: {}", e);
            return;
        }
    };

    connection.set_speaking(true).await;
    loop {
        if session.is_closed() {
            break;
        }
        let frame = match source.next_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) => {
                warn!(target: LOG_TARGET, path = %path.display(), "Playback ended early: {}", e);
                break;
            }
        };
        tokio::select! {
            _ = session.wait_teardown() => break,
            result = connection.send_frame(frame) => {
                if let Err(e) = result {
                    warn!(target: LOG_TARGET, "Transport rejected frame, ending item: {}", e);
                    break;
                }
            }
        }
    }
    connection.set_speaking(false).await;
}
