use crate::commands::context::CommandContext;
use crate::commands::controller::BotController;
use crate::commands::registry::Command;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::error;

const LOG_TARGET: &str = "voxbot::commands::join";

/// Joins the voice channel without queueing anything.
pub struct JoinCommand;

#[async_trait]
impl Command for JoinCommand {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext) {
        let session = bot.sessions().get_or_create(&ctx.guild_id);
        match session
            .ensure_connected(bot.connector(), &ctx.channel_id)
            .await
        {
            Ok(_) => bot.arm_inactivity_timer(&session, &ctx.channel_id),
            Err(e) => {
                error!(target: LOG_TARGET, guild_id = %ctx.guild_id, "Join failed: {}", e);
                bot.notifier()
                    .notify(&ctx.channel_id, "⚠ Failed to join voice channel.")
                    .await;
            }
        }
    }

    fn help(&self) -> &str {
        "!join - Join the voice channel of the user who sent the command."
    }
}
