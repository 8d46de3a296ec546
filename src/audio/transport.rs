use crate::audio::error::AudioError;
use crate::audio::frame::AudioFrame;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, info};

const LOG_TARGET: &str = "voxbot::audio::transport";

/// Live outbound voice connection.
///
/// `send_frame` may wait for transport backpressure but must not silently
/// drop frames. `disconnect` releases the underlying channel; further sends
/// after it fail.
#[async_trait]
pub trait VoiceConnection: Send + Sync {
    async fn set_speaking(&self, speaking: bool);
    async fn send_frame(&self, frame: AudioFrame) -> Result<(), AudioError>;
    async fn disconnect(&self);
}

/// Transport that appends raw interleaved S16LE PCM to a file.
///
/// Stands in for a real voice channel so the full pipeline can run locally;
/// the output is playable with `ffplay -f s16le -ar 48000 -ac 2 <file>`.
pub struct PcmFileSink {
    path: PathBuf,
    file: TokioMutex<Option<tokio::fs::File>>,
}

impl PcmFileSink {
    pub async fn create(path: &Path) -> Result<Self, AudioError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = tokio::fs::File::create(path).await?;
        info!(target: LOG_TARGET, path = %path.display(), "Opened PCM sink");
        Ok(PcmFileSink {
            path: path.to_path_buf(),
            file: TokioMutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VoiceConnection for PcmFileSink {
    async fn set_speaking(&self, speaking: bool) {
        debug!(target: LOG_TARGET, speaking, path = %self.path.display(), "Speaking state changed");
    }

    async fn send_frame(&self, frame: AudioFrame) -> Result<(), AudioError> {
        let mut guard = self.file.lock().await;
        let file = guard
            .as_mut()
            .ok_or_else(|| AudioError::StreamError("sink already disconnected".to_string()))?;

        let mut bytes = Vec::with_capacity(frame.samples.len() * 2);
        for sample in &frame.samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        file.write_all(&bytes).await?;
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(mut file) = self.file.lock().await.take() {
            let _ = file.flush().await;
            debug!(target: LOG_TARGET, path = %self.path.display(), "PCM sink closed");
        }
    }
}
