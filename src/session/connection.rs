use crate::audio::{PcmFileSink, VoiceConnection};
use crate::session::error::SessionError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const LOG_TARGET: &str = "voxbot::session::connection";

/// Collaborator that establishes a live voice connection for a guild
/// channel.
#[async_trait]
pub trait VoiceConnector: Send + Sync {
    async fn connect(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<Arc<dyn VoiceConnection>, SessionError>;
}

/// Connector that materializes each connection as a PCM capture file.
///
/// One file per connect call, so consecutive sessions in the same guild
/// never clobber each other's output.
pub struct PcmFileConnector {
    dir: PathBuf,
}

impl PcmFileConnector {
    pub fn new(dir: &Path) -> Self {
        PcmFileConnector {
            dir: dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl VoiceConnector for PcmFileConnector {
    async fn connect(
        &self,
        guild_id: &str,
        channel_id: &str,
    ) -> Result<Arc<dyn VoiceConnection>, SessionError> {
        let path = self
            .dir
            .join(format!("{}-{}.pcm", guild_id, Uuid::new_v4()));
        let sink = PcmFileSink::create(&path).await?;
        info!(
            target: LOG_TARGET,
            guild_id,
            channel_id,
            path = %path.display(),
            "Voice connection established"
        );
        Ok(Arc::new(sink))
    }
}
