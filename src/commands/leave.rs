use crate::commands::context::CommandContext;
use crate::commands::controller::BotController;
use crate::commands::registry::Command;
use async_trait::async_trait;
use std::sync::Arc;

/// Tears down the guild's session and leaves the voice channel.
pub struct LeaveCommand;

#[async_trait]
impl Command for LeaveCommand {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext) {
        let released = match bot.sessions().get(&ctx.guild_id) {
            Some(session) => {
                let released = session.teardown().await;
                bot.sessions().remove(&ctx.guild_id);
                released
            }
            None => false,
        };

        let message = if released {
            "✅ Left the voice channel."
        } else {
            "⚠ I'm not in a voice channel."
        };
        bot.notifier().notify(&ctx.channel_id, message).await;
    }

    fn help(&self) -> &str {
        "!leave - leave voice channel"
    }
}
