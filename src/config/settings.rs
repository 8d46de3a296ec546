//! Application settings and configuration management

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Prefix that marks a message token as a command
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Directory downloaded and transcoded audio files land in
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
    /// Directory PCM capture files are written to
    #[serde(default = "default_pcm_dir")]
    pub pcm_dir: String,
    /// Path to the yt-dlp binary
    #[serde(default = "default_yt_dlp_path")]
    pub yt_dlp_path: String,
    /// Path to the ffmpeg binary
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    /// Seconds of inactivity before the bot leaves the voice channel
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: u64,
    /// Upper bound on downloads running at once
    #[serde(default = "default_max_concurrent_downloads")]
    pub max_concurrent_downloads: usize,
    /// How often the playback loop re-checks a pending download, in ms
    #[serde(default = "default_download_poll_ms")]
    pub download_poll_ms: u64,
}

fn default_command_prefix() -> String {
    "!".to_string()
}

fn default_audio_dir() -> String {
    "audio".to_string()
}

fn default_pcm_dir() -> String {
    "pcm".to_string()
}

fn default_yt_dlp_path() -> String {
    "yt-dlp".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_inactivity_timeout_secs() -> u64 {
    300
}

fn default_max_concurrent_downloads() -> usize {
    4
}

fn default_download_poll_ms() -> u64 {
    500
}

/// Error types for configuration operations
#[derive(Debug)]
pub enum ConfigError {
    IoError(io::Error),
    ParseError(String),
    ValidationError(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigError::ParseError(s) => write!(f, "Parse error: {}", s),
            ConfigError::ValidationError(s) => write!(f, "Validation error: {}", s),
        }
    }
}

impl Error for ConfigError {}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            command_prefix: default_command_prefix(),
            audio_dir: default_audio_dir(),
            pcm_dir: default_pcm_dir(),
            yt_dlp_path: default_yt_dlp_path(),
            ffmpeg_path: default_ffmpeg_path(),
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
            download_poll_ms: default_download_poll_ms(),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(&self)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config").join("voxbot").join("config.json")
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "Command prefix cannot be empty".to_string(),
            ));
        }

        if self.audio_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "Audio directory cannot be empty".to_string(),
            ));
        }

        if self.inactivity_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "Inactivity timeout must be at least one second".to_string(),
            ));
        }

        if self.max_concurrent_downloads == 0 {
            return Err(ConfigError::ValidationError(
                "At least one concurrent download must be allowed".to_string(),
            ));
        }

        Ok(())
    }
}
