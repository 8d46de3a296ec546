use crate::media::error::MediaError;
use async_trait::async_trait;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

const LOG_TARGET: &str = "voxbot::media::fetcher";

/// Extensions the HTTP fetcher can pull directly without an extractor.
const DIRECT_AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "wav", "ogg", "flac", "webm", "opus"];

/// Collaborator that turns a source locator into a locally stored raw
/// audio file. A path returned as `Ok` is always a fully written file.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    async fn fetch(&self, source_url: &str) -> Result<PathBuf, MediaError>;
}

/// Fetcher that shells out to yt-dlp for extractor-backed sources.
pub struct YtDlpFetcher {
    yt_dlp_path: PathBuf,
    audio_dir: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(yt_dlp_path: &Path, audio_dir: &Path) -> Self {
        YtDlpFetcher {
            yt_dlp_path: yt_dlp_path.to_path_buf(),
            audio_dir: audio_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, source_url: &str) -> Result<PathBuf, MediaError> {
        tokio::fs::create_dir_all(&self.audio_dir).await?;

        // Key the output template by a fresh id so concurrent fetches of the
        // same source never collide.
        let download_id = Uuid::new_v4();
        let template = self
            .audio_dir
            .join(format!("{}.%(ext)s", download_id))
            .to_string_lossy()
            .into_owned();

        info!(target: LOG_TARGET, url = %source_url, "Downloading audio with yt-dlp");
        let status = Command::new(&self.yt_dlp_path)
            .arg("-f")
            .arg("bestaudio")
            .arg("-o")
            .arg(&template)
            .arg(source_url)
            .status()
            .await
            .map_err(|e| MediaError::FetchFailed(format!("failed to run yt-dlp: {}", e)))?;

        if !status.success() {
            return Err(MediaError::FetchFailed(format!(
                "yt-dlp exited with {} for {}",
                status, source_url
            )));
        }

        // yt-dlp picks the extension; locate the file by its id prefix.
        let prefix = download_id.to_string();
        let mut entries = tokio::fs::read_dir(&self.audio_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&prefix) {
                let path = entry.path();
                debug!(target: LOG_TARGET, path = %path.display(), "Download complete");
                return Ok(path);
            }
        }

        Err(MediaError::MissingOutput(format!(
            "no downloaded file found for {}",
            source_url
        )))
    }
}

/// Fetcher for plain audio URLs, streaming the body straight to disk.
pub struct HttpFetcher {
    client: reqwest::Client,
    audio_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(audio_dir: &Path) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                warn!(target: LOG_TARGET, "Error creating HTTP client with timeout: {:?}. Falling back to default.", e);
                reqwest::Client::new()
            }
        };
        HttpFetcher {
            client,
            audio_dir: audio_dir.to_path_buf(),
        }
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    async fn fetch(&self, source_url: &str) -> Result<PathBuf, MediaError> {
        let url =
            Url::parse(source_url).map_err(|e| MediaError::InvalidSource(e.to_string()))?;
        let extension = url_extension(&url).unwrap_or_else(|| "bin".to_string());

        tokio::fs::create_dir_all(&self.audio_dir).await?;
        let final_path = self
            .audio_dir
            .join(format!("{}.{}", Uuid::new_v4(), extension));
        let part_path = final_path.with_extension(format!("{}.part", extension));

        info!(target: LOG_TARGET, url = %source_url, "Downloading audio over HTTP");
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| MediaError::FetchFailed(e.to_string()))?;

        let mut file = tokio::fs::File::create(&part_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                MediaError::FetchFailed(format!("body stream error: {}", e))
            })?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        drop(file);

        // Only expose the file once it is completely written.
        tokio::fs::rename(&part_path, &final_path).await?;
        debug!(target: LOG_TARGET, path = %final_path.display(), "Download complete");
        Ok(final_path)
    }
}

/// Dispatches a source locator to the HTTP fetcher for direct audio links
/// and to yt-dlp for everything else.
pub struct SourceRouter {
    http: HttpFetcher,
    yt_dlp: YtDlpFetcher,
}

impl SourceRouter {
    pub fn new(http: HttpFetcher, yt_dlp: YtDlpFetcher) -> Self {
        SourceRouter { http, yt_dlp }
    }

    fn is_direct_audio(source_url: &str) -> bool {
        match Url::parse(source_url) {
            Ok(url) => url_extension(&url)
                .map(|ext| DIRECT_AUDIO_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl MediaFetcher for SourceRouter {
    async fn fetch(&self, source_url: &str) -> Result<PathBuf, MediaError> {
        if Self::is_direct_audio(source_url) {
            self.http.fetch(source_url).await
        } else {
            self.yt_dlp.fetch(source_url).await
        }
    }
}

fn url_extension(url: &Url) -> Option<String> {
    Path::new(url.path())
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_audio_detection() {
        assert!(SourceRouter::is_direct_audio(
            "https://example.com/tracks/song.mp3"
        ));
        assert!(SourceRouter::is_direct_audio(
            "https://example.com/a/b.FLAC"
        ));
        assert!(!SourceRouter::is_direct_audio(
            "https://www.youtube.com/watch?v=abc123"
        ));
        assert!(!SourceRouter::is_direct_audio("not a url"));
    }

    #[test]
    fn test_url_extension() {
        let url = Url::parse("https://example.com/x/y.Mp3?session=1").unwrap();
        assert_eq!(url_extension(&url), Some("mp3".to_string()));

        let url = Url::parse("https://example.com/watch?v=abc").unwrap();
        assert_eq!(url_extension(&url), None);
    }
}
