//! Integration tests for command routing
//!
//! These tests verify end-to-end dispatch: token parsing, concurrent
//! handler execution and the unknown command notice.

use crate::test_utils::*;
use std::sync::Arc;
use std::time::Duration;
use voxbot::commands::BotController;

async fn dispatch(bot: &Arc<BotController>, content: &str) {
    for handle in bot.dispatch_message("guild-1", "chan-1", "user-1", content) {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_two_commands_in_one_message_both_run() {
    let harness = build_harness(HarnessOptions::default());

    dispatch(&harness.bot, "!ping !timeout 2").await;

    assert!(harness.notifier.contains("Pong! 🏓"));
    assert!(harness.notifier.contains("Timeout duration set to 2 minutes."));
    assert_eq!(harness.bot.inactivity_timeout(), Duration::from_secs(120));
}

#[tokio::test]
async fn test_unknown_token_produces_single_notice() {
    let harness = build_harness(HarnessOptions::default());

    dispatch(&harness.bot, "!frobnicate now please").await;

    let messages = harness.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].1, "Unknown command: !frobnicate");
}

#[tokio::test]
async fn test_known_and_unknown_tokens_mix() {
    let harness = build_harness(HarnessOptions::default());

    dispatch(&harness.bot, "!ping !frobnicate").await;

    assert!(harness.notifier.contains("Pong! 🏓"));
    assert_eq!(
        harness.notifier.count_containing("Unknown command: !frobnicate"),
        1
    );
}

#[tokio::test]
async fn test_plain_chatter_is_ignored() {
    let harness = build_harness(HarnessOptions::default());

    assert!(harness
        .bot
        .dispatch_message("guild-1", "chan-1", "user-1", "nothing to see here")
        .is_empty());
    assert!(harness.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_options_bind_to_their_command() {
    let harness = build_harness(HarnessOptions::default());
    harness.encoder.register("song-a", 1);

    dispatch(
        &harness.bot,
        "!play https://example.com/song-a !timeout 3",
    )
    .await;

    // play received only its own option.
    assert_eq!(
        harness
            .notifier
            .count_containing("🎵 Added to queue: https://example.com/song-a"),
        1
    );
    assert!(!harness.notifier.contains("🎵 Added to queue: 3"));
    assert_eq!(harness.bot.inactivity_timeout(), Duration::from_secs(180));
}
