use super::cli::Args;
use clap::Parser;

#[test]
fn test_args_parse_defaults_to_none() {
    let args = Args::parse_from(["voxbot"]);
    assert!(args.config.is_none());
    assert!(args.audio_dir.is_none());
    assert!(args.pcm_dir.is_none());
    assert!(args.timeout_secs.is_none());
    assert!(args.yt_dlp.is_none());
    assert!(args.ffmpeg.is_none());
}

#[test]
fn test_args_parse_long_flags() {
    let args = Args::parse_from([
        "voxbot",
        "--config",
        "/tmp/voxbot.json",
        "--audio-dir",
        "/tmp/audio",
        "--timeout-secs",
        "120",
        "--yt-dlp",
        "/usr/local/bin/yt-dlp",
    ]);
    assert_eq!(args.config.as_deref(), Some("/tmp/voxbot.json"));
    assert_eq!(args.audio_dir.as_deref(), Some("/tmp/audio"));
    assert_eq!(args.timeout_secs, Some(120));
    assert_eq!(args.yt_dlp.as_deref(), Some("/usr/local/bin/yt-dlp"));
}
