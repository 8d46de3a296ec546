//! Command-line interface implementation

use clap::Parser;
use std::error::Error;

/// Command-line arguments for voxbot
#[derive(Parser, Debug)]
#[command(author, version, about = "Voice channel music bot", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, env = "VOXBOT_CONFIG")]
    pub config: Option<String>,

    /// Directory for downloaded audio files
    #[arg(short, long, env = "VOXBOT_AUDIO_DIR")]
    pub audio_dir: Option<String>,

    /// Directory for PCM capture files
    #[arg(short, long, env = "VOXBOT_PCM_DIR")]
    pub pcm_dir: Option<String>,

    /// Inactivity timeout in seconds before leaving the voice channel
    #[arg(short, long, env = "VOXBOT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Path to the yt-dlp binary
    #[arg(long, env = "VOXBOT_YT_DLP")]
    pub yt_dlp: Option<String>,

    /// Path to the ffmpeg binary
    #[arg(long, env = "VOXBOT_FFMPEG")]
    pub ffmpeg: Option<String>,
}

/// CLI user interface for interacting with the application
pub struct Cli {
    pub args: Args,
}

impl Cli {
    /// Create a new CLI instance
    pub fn new() -> Self {
        Cli {
            args: Args::parse(),
        }
    }

    /// Display error messages
    pub fn display_error(&self, error: &dyn Error) {
        eprintln!("Error: {}", error);
    }
}
