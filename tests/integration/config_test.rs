//! Integration tests for configuration management
//!
//! These tests verify settings persistence through the public API.

use tempfile::tempdir;
use voxbot::config::Settings;

#[test]
fn test_settings_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("config.json");

    let mut settings = Settings::default();
    settings.command_prefix = "~".to_string();
    settings.audio_dir = "/var/lib/voxbot/audio".to_string();
    settings.inactivity_timeout_secs = 900;
    settings.save(&config_path)?;

    let loaded = Settings::load(&config_path)?;
    assert_eq!(loaded.command_prefix, "~");
    assert_eq!(loaded.audio_dir, "/var/lib/voxbot/audio");
    assert_eq!(loaded.inactivity_timeout_secs, 900);
    assert!(loaded.validate().is_ok());
    Ok(())
}

#[test]
fn test_handwritten_config_with_extra_fields() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{
            "command_prefix": "!",
            "download_poll_ms": 250,
            "legacy_field_nobody_reads": true
        }"#,
    )?;

    let loaded = Settings::load(&config_path)?;
    assert_eq!(loaded.download_poll_ms, 250);
    assert_eq!(loaded.max_concurrent_downloads, 4);
    Ok(())
}

#[test]
fn test_invalid_json_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(&config_path, "{not json").unwrap();

    let result = Settings::load(&config_path);
    assert!(result.is_err());
}
