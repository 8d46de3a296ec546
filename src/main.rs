use voxbot::audio::SymphoniaEncoder;
use voxbot::commands::{BotController, ControllerConfig};
use voxbot::config::Settings;
use voxbot::init_app_dirs;
use voxbot::media::{FfmpegTranscoder, HttpFetcher, SourceRouter, YtDlpFetcher};
use voxbot::session::PcmFileConnector;
use voxbot::ui::{Cli, ConsoleNotifier};

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "voxbot::main";

/// Guild and channel ids the console session is addressed to.
const CONSOLE_GUILD: &str = "console";
const CONSOLE_CHANNEL: &str = "console";
const CONSOLE_USER: &str = "operator";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments and initialize CLI
    let cli = Cli::new();
    let args = &cli.args;

    // Initialize application directories
    init_app_dirs()?;

    // Load configuration from file or create default
    let config_path = match &args.config {
        Some(path) => Path::new(path).to_path_buf(),
        None => Settings::default_path(),
    };

    let mut settings = Settings::load(&config_path)?;

    // Command-line arguments (which also absorb VOXBOT_* environment
    // variables through clap) override the config file.
    if let Some(audio_dir) = &args.audio_dir {
        settings.audio_dir = audio_dir.clone();
    }
    if let Some(pcm_dir) = &args.pcm_dir {
        settings.pcm_dir = pcm_dir.clone();
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.inactivity_timeout_secs = timeout_secs;
    }
    if let Some(yt_dlp) = &args.yt_dlp {
        settings.yt_dlp_path = yt_dlp.clone();
    }
    if let Some(ffmpeg) = &args.ffmpeg {
        settings.ffmpeg_path = ffmpeg.clone();
    }

    // Validate settings
    settings.validate()?;

    std::fs::create_dir_all(&settings.audio_dir)?;
    std::fs::create_dir_all(&settings.pcm_dir)?;

    let audio_dir = Path::new(&settings.audio_dir);
    let fetcher = Arc::new(SourceRouter::new(
        HttpFetcher::new(audio_dir),
        YtDlpFetcher::new(Path::new(&settings.yt_dlp_path), audio_dir),
    ));
    let transcoder = Arc::new(FfmpegTranscoder::new(Path::new(&settings.ffmpeg_path)));
    let encoder = Arc::new(SymphoniaEncoder::new());
    let connector = Arc::new(PcmFileConnector::new(Path::new(&settings.pcm_dir)));
    let notifier = Arc::new(ConsoleNotifier::new());

    let bot = BotController::new(
        ControllerConfig {
            command_prefix: settings.command_prefix.clone(),
            inactivity_timeout: Duration::from_secs(settings.inactivity_timeout_secs),
            poll_interval: Duration::from_millis(settings.download_poll_ms),
            max_concurrent_downloads: settings.max_concurrent_downloads,
        },
        fetcher,
        transcoder,
        encoder,
        connector,
        notifier,
    );

    info!(target: LOG_TARGET, prefix = %settings.command_prefix, "Bot ready, reading commands from stdin");
    println!(
        "Type {}help for commands, 'quit' to exit.",
        settings.command_prefix
    );

    // Main application loop: one console session, commands line by line.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        cli.display_error(&e);
                        break;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("q") {
                    break;
                }
                bot.dispatch_message(CONSOLE_GUILD, CONSOLE_CHANNEL, CONSOLE_USER, trimmed);
            }
        }
    }

    // Leave cleanly so the PCM sink is flushed.
    if let Some(session) = bot.sessions().get(CONSOLE_GUILD) {
        session.teardown().await;
        bot.sessions().remove(CONSOLE_GUILD);
    }
    info!(target: LOG_TARGET, "Shutting down");

    Ok(())
}
