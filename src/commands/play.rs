use crate::commands::context::CommandContext;
use crate::commands::controller::BotController;
use crate::commands::registry::Command;
use crate::media::MediaItem;
use crate::session::{spawn_playback_loop, PlaybackContext};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

const LOG_TARGET: &str = "voxbot::commands::play";

/// Queues one or more links for playback and starts the playback loop if
/// the session is idle.
pub struct PlayCommand;

#[async_trait]
impl Command for PlayCommand {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext) {
        if ctx.options.is_empty() {
            bot.notifier()
                .notify(&ctx.channel_id, "⚠ Usage: `!play <music_link>`")
                .await;
            return;
        }

        let mut links = Vec::new();
        for option in &ctx.options {
            if Url::parse(option).is_ok() {
                links.push(option.clone());
            } else {
                warn!(target: LOG_TARGET, guild_id = %ctx.guild_id, link = %option, "Rejected malformed link");
                bot.notifier()
                    .notify(&ctx.channel_id, &format!("⚠ Invalid music link: {}", option))
                    .await;
            }
        }
        if links.is_empty() {
            return;
        }

        let session = bot.sessions().get_or_create(&ctx.guild_id);
        for url in &links {
            info!(target: LOG_TARGET, guild_id = %ctx.guild_id, url, "Queueing link");
            let item = MediaItem::new(url);
            session.queue().enqueue(item.clone());
            bot.notifier()
                .notify(&ctx.channel_id, &format!("🎵 Added to queue: {}", url))
                .await;
            bot.supervisor().submit(item);
        }

        bot.arm_inactivity_timer(&session, &ctx.channel_id);
        spawn_playback_loop(
            session,
            bot.playback_deps(),
            PlaybackContext {
                guild_id: ctx.guild_id.clone(),
                channel_id: ctx.channel_id.clone(),
            },
        );
    }

    fn help(&self) -> &str {
        "!play <music_link> - Plays the specified music link(s)."
    }
}
