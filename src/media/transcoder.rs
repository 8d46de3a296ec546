use crate::media::error::MediaError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

const LOG_TARGET: &str = "voxbot::media::transcoder";

/// Collaborator that converts a raw downloaded file into the canonical
/// playable format. The input file is never mutated.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn convert(&self, raw_path: &Path) -> Result<PathBuf, MediaError>;
}

/// Transcoder that shells out to ffmpeg, producing MP3.
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: &Path) -> Self {
        FfmpegTranscoder {
            ffmpeg_path: ffmpeg_path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn convert(&self, raw_path: &Path) -> Result<PathBuf, MediaError> {
        let output_path = raw_path.with_extension("mp3");
        if output_path == raw_path {
            // Already in the canonical format.
            debug!(target: LOG_TARGET, path = %raw_path.display(), "Input already MP3, skipping conversion");
            return Ok(raw_path.to_path_buf());
        }

        info!(target: LOG_TARGET, input = %raw_path.display(), "Converting to MP3 with ffmpeg");
        let status = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(raw_path)
            .arg("-q:a")
            .arg("0")
            .arg("-map")
            .arg("a")
            .arg(&output_path)
            .status()
            .await
            .map_err(|e| MediaError::TranscodeFailed(format!("failed to run ffmpeg: {}", e)))?;

        if !status.success() {
            return Err(MediaError::TranscodeFailed(format!(
                "ffmpeg exited with {} for {}",
                status,
                raw_path.display()
            )));
        }

        if !output_path.exists() {
            return Err(MediaError::MissingOutput(
                output_path.display().to_string(),
            ));
        }

        // The raw download is no longer needed once converted.
        if let Err(e) = tokio::fs::remove_file(raw_path).await {
            warn!(target: LOG_TARGET, path = %raw_path.display(), "Failed to remove raw download: {}", e);
        }

        debug!(target: LOG_TARGET, output = %output_path.display(), "Conversion complete");
        Ok(output_path)
    }
}
