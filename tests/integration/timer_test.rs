//! Integration tests for inactivity handling
//!
//! These tests verify that command activity defers the inactivity timeout
//! and that expiry tears the session down exactly once.

use crate::test_utils::*;
use std::sync::Arc;
use std::time::Duration;
use voxbot::commands::BotController;

async fn dispatch(bot: &Arc<BotController>, content: &str) {
    for handle in bot.dispatch_message("guild-1", "chan-1", "user-1", content) {
        handle.await.unwrap();
    }
}

const INACTIVITY_NOTICE: &str = "✅ Left the voice channel due to inactivity.";

#[tokio::test]
async fn test_repeated_resets_yield_single_expiry() {
    let harness = build_harness(HarnessOptions {
        inactivity_timeout: Duration::from_millis(150),
        ..HarnessOptions::default()
    });

    dispatch(&harness.bot, "!join").await;
    assert_eq!(harness.connector.connect_count(), 1);

    // Keep the session busy; each command supersedes the armed deadline.
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        dispatch(&harness.bot, "!ping").await;
    }
    assert_eq!(harness.notifier.count_containing(INACTIVITY_NOTICE), 0);

    // Now go quiet and let the last deadline expire.
    assert!(
        wait_until(
            || harness.notifier.count_containing(INACTIVITY_NOTICE) == 1,
            Duration::from_secs(2)
        )
        .await,
        "expected exactly one inactivity notice"
    );

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(harness.notifier.count_containing(INACTIVITY_NOTICE), 1);
    assert_eq!(harness.connection().disconnect_count(), 1);
    assert!(harness.bot.sessions().get("guild-1").is_none());
}

#[tokio::test]
async fn test_expiry_with_slow_disconnect_finishes_teardown() {
    let harness = build_harness(HarnessOptions {
        inactivity_timeout: Duration::from_millis(100),
        disconnect_delay: Duration::from_millis(100),
        ..HarnessOptions::default()
    });

    dispatch(&harness.bot, "!join").await;

    // Even though teardown cancels the session timer from inside the
    // expiry callback, the slow disconnect and the notice must complete.
    assert!(
        wait_until(
            || harness.notifier.count_containing(INACTIVITY_NOTICE) == 1,
            Duration::from_secs(2)
        )
        .await,
        "expected the inactivity notice after the disconnect finished"
    );
    assert_eq!(harness.connection().disconnect_count(), 1);
    assert!(harness.bot.sessions().get("guild-1").is_none());
}

#[tokio::test]
async fn test_expiry_without_connection_stays_silent() {
    let harness = build_harness(HarnessOptions {
        inactivity_timeout: Duration::from_millis(100),
        ..HarnessOptions::default()
    });

    // A session with no voice connection: created by hand, timer armed by
    // command traffic.
    harness.bot.sessions().get_or_create("guild-1");
    dispatch(&harness.bot, "!ping").await;

    assert!(
        wait_until(
            || harness.bot.sessions().get("guild-1").is_none(),
            Duration::from_secs(2)
        )
        .await,
        "expected the idle session to be removed"
    );
    assert_eq!(harness.notifier.count_containing(INACTIVITY_NOTICE), 0);
    assert_eq!(harness.connection().disconnect_count(), 0);
}

#[tokio::test]
async fn test_session_after_expiry_reconnects() {
    let harness = build_harness(HarnessOptions {
        inactivity_timeout: Duration::from_millis(100),
        ..HarnessOptions::default()
    });
    harness.encoder.register("song-a", 1);

    dispatch(&harness.bot, "!join").await;
    assert!(
        wait_until(
            || harness.notifier.count_containing(INACTIVITY_NOTICE) == 1,
            Duration::from_secs(2)
        )
        .await
    );

    // The next play gets a fresh session and a fresh connection.
    dispatch(&harness.bot, "!play https://example.com/song-a").await;
    let connection = harness.connection().clone();
    assert!(wait_until(|| connection.frame_count() == 3, Duration::from_secs(5)).await);
    assert_eq!(harness.connector.connect_count(), 2);
}
