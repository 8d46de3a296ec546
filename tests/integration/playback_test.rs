//! Integration tests for the playback pipeline
//!
//! These tests drive the bot through its command surface and observe what
//! reaches the voice transport.

use crate::test_utils::*;
use std::sync::Arc;
use std::time::Duration;
use voxbot::commands::BotController;

async fn dispatch(bot: &Arc<BotController>, content: &str) {
    for handle in bot.dispatch_message("guild-1", "chan-1", "user-1", content) {
        handle.await.unwrap();
    }
}

/// Consecutive duplicate tags collapsed into one entry per run.
fn contiguous_runs(tags: &[i16]) -> Vec<i16> {
    let mut runs = Vec::new();
    for &tag in tags {
        if runs.last() != Some(&tag) {
            runs.push(tag);
        }
    }
    runs
}

#[tokio::test]
async fn test_playback_order_is_fifo_despite_download_order() {
    let harness = build_harness(HarnessOptions::default());

    // The first item downloads much slower than the second.
    harness.fetcher.plan("https://example.com/song-a", 300, false);
    harness.fetcher.plan("https://example.com/song-b", 100, false);
    harness.encoder.register("song-a", 1);
    harness.encoder.register("song-b", 2);

    dispatch(
        &harness.bot,
        "!play https://example.com/song-a https://example.com/song-b",
    )
    .await;

    let connection = harness.connection().clone();
    assert!(
        wait_until(|| connection.frame_count() == 6, Duration::from_secs(5)).await,
        "expected both items to finish streaming"
    );

    assert_eq!(connection.frame_tags(), vec![1, 1, 1, 2, 2, 2]);
    assert_eq!(harness.connector.connect_count(), 1);
}

#[tokio::test]
async fn test_failed_download_does_not_halt_queue() {
    let harness = build_harness(HarnessOptions::default());

    harness.fetcher.plan("https://example.com/song-a", 50, true);
    harness.fetcher.plan("https://example.com/song-b", 20, false);
    harness.encoder.register("song-b", 2);

    dispatch(
        &harness.bot,
        "!play https://example.com/song-a https://example.com/song-b",
    )
    .await;

    let connection = harness.connection().clone();
    assert!(
        wait_until(|| connection.frame_count() == 3, Duration::from_secs(5)).await,
        "expected the second item to stream"
    );

    assert_eq!(connection.frame_tags(), vec![2, 2, 2]);
    assert_eq!(
        harness
            .notifier
            .count_containing("⚠ Error downloading song: https://example.com/song-a"),
        1
    );
}

#[tokio::test]
async fn test_concurrent_plays_share_one_loop_and_connection() {
    let harness = build_harness(HarnessOptions::default());
    for i in 1..=4 {
        harness
            .fetcher
            .plan(&format!("https://example.com/song-{}", i), 20, false);
        harness.encoder.register(&format!("song-{}", i), i as i16);
    }

    let mut dispatches = Vec::new();
    for i in 1..=4 {
        let bot = harness.bot.clone();
        dispatches.push(tokio::spawn(async move {
            for handle in bot.dispatch_message(
                "guild-1",
                "chan-1",
                "user-1",
                &format!("!play https://example.com/song-{}", i),
            ) {
                handle.await.unwrap();
            }
        }));
    }
    for handle in dispatches {
        handle.await.unwrap();
    }

    let connection = harness.connection().clone();
    assert!(
        wait_until(|| connection.frame_count() == 12, Duration::from_secs(5)).await,
        "expected all four items to finish streaming"
    );

    // A single connection serves every item, and items never interleave.
    assert_eq!(harness.connector.connect_count(), 1);
    let mut runs = contiguous_runs(&connection.frame_tags());
    assert_eq!(runs.len(), 4);
    runs.sort_unstable();
    assert_eq!(runs, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_queue_drain_then_new_play_reuses_session() {
    let harness = build_harness(HarnessOptions::default());
    harness.encoder.register("song-a", 1);
    harness.encoder.register("song-b", 2);

    dispatch(&harness.bot, "!play https://example.com/song-a").await;
    let connection = harness.connection().clone();
    assert!(wait_until(|| connection.frame_count() == 3, Duration::from_secs(5)).await);

    // The loop has gone idle; a later play starts a fresh one.
    dispatch(&harness.bot, "!play https://example.com/song-b").await;
    assert!(wait_until(|| connection.frame_count() == 6, Duration::from_secs(5)).await);

    assert_eq!(connection.frame_tags(), vec![1, 1, 1, 2, 2, 2]);
    assert_eq!(harness.connector.connect_count(), 1);
}

#[tokio::test]
async fn test_leave_mid_stream_halts_promptly_and_disconnects_once() {
    let harness = build_harness(HarnessOptions {
        frames_per_item: 500,
        send_delay: Duration::from_millis(5),
        ..HarnessOptions::default()
    });
    harness.encoder.register("song-a", 1);

    dispatch(&harness.bot, "!play https://example.com/song-a").await;
    let connection = harness.connection().clone();
    assert!(
        wait_until(|| connection.frame_count() >= 5, Duration::from_secs(5)).await,
        "expected streaming to be underway"
    );

    dispatch(&harness.bot, "!leave").await;
    assert!(harness.notifier.contains("✅ Left the voice channel."));
    assert_eq!(connection.disconnect_count(), 1);

    // The stream stops within a frame of the teardown.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let after_teardown = connection.frame_count();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(connection.frame_count() <= after_teardown + 1);

    // Leaving again neither notifies success nor disconnects twice.
    dispatch(&harness.bot, "!leave").await;
    assert!(harness.notifier.contains("⚠ I'm not in a voice channel."));
    assert_eq!(connection.disconnect_count(), 1);
}

#[tokio::test]
async fn test_now_playing_notices_follow_queue_order() {
    let harness = build_harness(HarnessOptions::default());
    harness.fetcher.plan("https://example.com/song-a", 100, false);
    harness.encoder.register("song-a", 1);
    harness.encoder.register("song-b", 2);

    dispatch(
        &harness.bot,
        "!play https://example.com/song-a https://example.com/song-b",
    )
    .await;

    let connection = harness.connection().clone();
    assert!(wait_until(|| connection.frame_count() == 6, Duration::from_secs(5)).await);

    let now_playing: Vec<String> = harness
        .notifier
        .messages()
        .into_iter()
        .map(|(_, message)| message)
        .filter(|message| message.starts_with("🎶 Now playing:"))
        .collect();
    assert_eq!(
        now_playing,
        vec![
            "🎶 Now playing: https://example.com/song-a",
            "🎶 Now playing: https://example.com/song-b"
        ]
    );
}
