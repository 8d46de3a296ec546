use crate::commands::context::CommandContext;
use crate::commands::controller::BotController;
use crate::commands::registry::Command;
use async_trait::async_trait;
use std::sync::Arc;

/// Liveness check.
pub struct PingCommand;

#[async_trait]
impl Command for PingCommand {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext) {
        bot.notifier().notify(&ctx.channel_id, "Pong! 🏓").await;
    }

    fn help(&self) -> &str {
        "!ping - Check whether the bot is alive."
    }
}

/// Lists every registered command with its usage line.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    async fn execute(&self, bot: Arc<BotController>, ctx: CommandContext) {
        let mut lines = vec!["Available commands:".to_string()];
        for name in bot.registry().names() {
            if let Some(command) = bot.registry().get(&name) {
                lines.push(command.help().to_string());
            }
        }
        bot.notifier().notify(&ctx.channel_id, &lines.join("\n")).await;
    }

    fn help(&self) -> &str {
        "!help - Show this command listing."
    }
}
